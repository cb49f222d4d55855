use std::collections::BTreeMap;

use apriori_core::{AdId, ClusterId};
use serde::{Deserialize, Serialize};

/// Minimum budget share (percent) an ad must earn to be kept in the portfolio.
pub const MIN_BUDGET_SHARE_PCT: f64 = 5.0;

/// Click rate (percent) above which a low-converting ad is flagged as clickbait.
pub const CLICKBAIT_MIN_CLICK_RATE: f64 = 15.0;

/// Conversion rate (percent) below which a high-clicking ad is flagged as clickbait.
pub const CLICKBAIT_MAX_CONVERSION_RATE: f64 = 5.0;

/// Tunable selection and alerting thresholds.
///
/// Defaults are [`MIN_BUDGET_SHARE_PCT`], [`CLICKBAIT_MIN_CLICK_RATE`] and
/// [`CLICKBAIT_MAX_CONVERSION_RATE`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPolicy {
    pub min_budget_share_pct: f64,
    pub clickbait_min_click_rate: f64,
    pub clickbait_max_conversion_rate: f64,
}

impl Default for PortfolioPolicy {
    fn default() -> Self {
        Self {
            min_budget_share_pct: MIN_BUDGET_SHARE_PCT,
            clickbait_min_click_rate: CLICKBAIT_MIN_CLICK_RATE,
            clickbait_max_conversion_rate: CLICKBAIT_MAX_CONVERSION_RATE,
        }
    }
}

/// Aggregate metrics for one ad across every reaction it received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdPerformance {
    pub ad_id: AdId,
    pub total_impressions: usize,
    pub clicks: usize,
    pub high_intent_leads: usize,
    /// Percentage, rounded to two decimals.
    pub click_rate: f64,
    /// High-intent share as a percentage, rounded to two decimals.
    pub conversion_rate: f64,
    /// Distinct personas that saw the ad, whatever they did with it.
    pub unique_reach: usize,
}

/// The ad that dominates one persona cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentOwnership {
    pub cluster_id: ClusterId,
    pub winning_ad: AdId,
    /// Mean trust of the winning ad's reactions inside the cluster.
    pub trust_score: f64,
    /// Mean relevance of the winning ad's reactions inside the cluster.
    pub relevance_score: f64,
    /// High-intent share of the winning ad's reactions inside the cluster, in percent.
    pub conversion_rate: f64,
    pub high_intent_count: usize,
    pub persona_count: usize,
    pub reasoning: String,
    /// Composite score of every candidate ad for this cluster.
    pub all_ad_scores: BTreeMap<AdId, f64>,
}

/// Most frequent value of one persona attribute and how concentrated it is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    pub value: String,
    /// Share of the personas holding `value`, in percent.
    pub percentage: f64,
}

/// Statistical portrait of the personas in a cluster, with a readable label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    pub label: String,
    pub state: Concentration,
    pub occupation: Concentration,
    pub zone: Concentration,
    pub age_category: Concentration,
    pub income_tier: Concentration,
    pub avg_digital_literacy: f64,
    pub avg_trust_score: f64,
    pub persona_count: usize,
    /// Mean of the five concentration percentages, scaled to `0.0..=1.0`.
    pub confidence: f64,
}

/// Summary of one cluster as reported alongside the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInfo {
    pub size: usize,
    pub owner: Option<AdId>,
    pub value: f64,
}

/// One selected ad with its share of spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRecommendation {
    pub ad_id: AdId,
    pub role: String,
    /// Share of budget in percent; all recommendations sum to 100.
    pub budget_split: f64,
    pub target_segment: String,
    pub unique_reach: usize,
    pub expected_conversions: usize,
    pub reasoning: Option<String>,
    /// Clusters this ad dominates, highest value first.
    pub owned_segments: Vec<ClusterId>,
    pub segment: Option<SegmentDescriptor>,
}

/// Full output of a portfolio optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub winning_portfolio: Vec<PortfolioRecommendation>,
    pub all_performances: BTreeMap<AdId, AdPerformance>,
    pub overlap_matrix: BTreeMap<AdId, BTreeMap<AdId, f64>>,
    pub audience_segments: BTreeMap<AdId, BTreeMap<String, usize>>,
    pub segment_ownership: BTreeMap<ClusterId, SegmentOwnership>,
    pub clusters: BTreeMap<ClusterId, ClusterInfo>,
    pub wasted_spend_alerts: Vec<String>,
}

