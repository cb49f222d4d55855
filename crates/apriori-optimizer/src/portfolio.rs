//! Segment-dominance budget allocation.
//!
//! Each ad earns budget in proportion to the value of the persona clusters
//! it dominates, rather than its aggregate click-through. Ads whose share
//! clears the meaningful-allocation threshold are kept, capped at `max_ads`,
//! and renormalized to sum to exactly 100.

use std::collections::{BTreeMap, HashMap, HashSet};

use apriori_core::{AdId, ClusterId, Persona, Reaction};

use crate::clusters::fragment_audience_into_clusters;
use crate::descriptor::identify_specific_segment;
use crate::math::round_to;
use crate::overlap::compute_audience_overlap;
use crate::ownership::assign_segment_owners;
use crate::performance::{compute_ad_performance, detect_clickbait_traps};
use crate::segments::identify_audience_segments;
use crate::types::{
    AdPerformance, ClusterInfo, PortfolioPolicy, PortfolioRecommendation, PortfolioResult,
    SegmentOwnership,
};

/// Target segment reported for an ad that owns no cluster.
const GENERAL_SEGMENT: &str = "General";

/// Inputs to the creative-role decision table.
struct RoleSignals<'a> {
    trust: f64,
    conversion_rate: f64,
    click_rate: f64,
    segment: &'a str,
}

impl RoleSignals<'_> {
    fn mentions(&self, keyword: &str) -> bool {
        self.segment.contains(keyword)
    }
}

struct RoleRule {
    role: &'static str,
    matches: fn(&RoleSignals<'_>) -> bool,
}

/// Evaluated top to bottom; the first matching rule names the role.
const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        role: "The Trust Magnet",
        matches: |s| s.trust >= 8.0 && s.conversion_rate >= 70.0 && s.mentions("Senior"),
    },
    RoleRule {
        role: "The Growth Hook",
        matches: |s| (s.mentions("Young") || s.mentions("Youth")) && s.conversion_rate >= 60.0,
    },
    RoleRule {
        role: "The Converter",
        matches: |s| s.conversion_rate >= 70.0,
    },
    RoleRule {
        role: "The Premium Play",
        matches: |s| s.mentions("High-Income") && s.trust >= 7.0,
    },
    RoleRule {
        role: "The Trust Builder",
        matches: |s| s.mentions("Rural") || s.trust >= 8.0,
    },
    RoleRule {
        role: "The Tech-Savvy Performer",
        matches: |s| s.mentions("High Tech-Savvy") || s.mentions("Tech-Comfortable"),
    },
    RoleRule {
        role: "The Engager",
        matches: |s| s.click_rate > 20.0,
    },
    RoleRule {
        role: "The Value Champion",
        matches: |s| s.mentions("Budget-Conscious"),
    },
];

const DEFAULT_ROLE: &str = "The Reach Extender";

/// Qualitative creative role for a selected ad.
///
/// `trust` and `conversion_rate` describe the ad inside its primary segment,
/// `click_rate` is the ad's overall click rate, and `segment` is the primary
/// segment's label.
#[must_use]
pub fn assign_role(trust: f64, conversion_rate: f64, segment: &str, click_rate: f64) -> &'static str {
    let signals = RoleSignals {
        trust,
        conversion_rate,
        click_rate,
        segment,
    };
    ROLE_RULES
        .iter()
        .find(|rule| (rule.matches)(&signals))
        .map_or(DEFAULT_ROLE, |rule| rule.role)
}

/// Value of a dominated cluster: leads weighted by trust and relevance.
fn segment_value(ownership: &SegmentOwnership) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let leads = ownership.high_intent_count as f64;
    leads * ownership.trust_score * ownership.relevance_score / 10.0
}

/// Scale `shares` to percentages summing to exactly 100, rounded to one
/// decimal. The rounding remainder is absorbed by the first entry.
fn renormalize(shares: &[f64]) -> Vec<f64> {
    if shares.is_empty() {
        return Vec::new();
    }
    let total: f64 = shares.iter().sum();
    #[allow(clippy::cast_precision_loss)]
    let scaled: Vec<f64> = if total > 0.0 {
        shares.iter().map(|s| s / total * 100.0).collect()
    } else {
        vec![100.0 / shares.len() as f64; shares.len()]
    };

    let mut rounded: Vec<f64> = scaled.iter().map(|s| round_to(*s, 1)).collect();
    let rest: f64 = rounded[1..].iter().sum();
    rounded[0] = round_to(100.0 - rest, 1);
    rounded
}

/// Pick ads whose share clears the threshold, or fall back to the single ad
/// with the most high-intent leads at a full share.
fn select_ads(
    shares: &BTreeMap<&str, f64>,
    performances: &BTreeMap<AdId, AdPerformance>,
    max_ads: usize,
    policy: &PortfolioPolicy,
) -> Vec<(AdId, f64)> {
    let mut selected: Vec<(AdId, f64)> = shares
        .iter()
        .filter(|(_, share)| **share >= policy.min_budget_share_pct)
        .map(|(&ad_id, &share)| (ad_id.to_string(), share))
        .collect();
    selected.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    selected.truncate(max_ads);

    if !selected.is_empty() {
        return selected;
    }

    // BTreeMap iteration is ordered by ad id; keep the first on ties.
    let mut best: Option<&AdPerformance> = None;
    for perf in performances.values() {
        if best.is_none_or(|top| perf.high_intent_leads > top.high_intent_leads) {
            best = Some(perf);
        }
    }

    match best {
        Some(perf) => {
            tracing::info!(
                ad_id = %perf.ad_id,
                high_intent_leads = perf.high_intent_leads,
                "no ad cleared the allocation threshold; falling back to the top lead generator"
            );
            vec![(perf.ad_id.clone(), 100.0)]
        }
        None => Vec::new(),
    }
}

/// Build the full portfolio with the default [`PortfolioPolicy`].
#[must_use]
pub fn optimize_portfolio(reactions: &[Reaction], personas: &[Persona], max_ads: usize) -> PortfolioResult {
    optimize_portfolio_with_policy(reactions, personas, max_ads, &PortfolioPolicy::default())
}

/// Build the full portfolio: performance, overlap, cluster ownership, budget
/// split, creative roles, and clickbait alerts.
///
/// Never fails. Empty inputs produce empty maps and an empty portfolio;
/// reactions from unknown personas count toward ad-level metrics but belong
/// to no cluster. A `max_ads` of zero is treated as one.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn optimize_portfolio_with_policy(
    reactions: &[Reaction],
    personas: &[Persona],
    max_ads: usize,
    policy: &PortfolioPolicy,
) -> PortfolioResult {
    let known: HashSet<&str> = personas.iter().map(|p| p.uuid.as_str()).collect();
    let orphaned = reactions
        .iter()
        .filter(|r| !known.contains(r.persona_uuid.as_str()))
        .count();
    if orphaned > 0 {
        tracing::warn!(
            orphaned,
            "reactions reference unknown personas; excluded from cluster ownership"
        );
    }
    tracing::debug!(
        reactions = reactions.len(),
        personas = personas.len(),
        max_ads,
        "optimizing portfolio"
    );

    let all_performances = compute_ad_performance(reactions);
    let overlap_matrix = compute_audience_overlap(reactions);
    let audience_segments = identify_audience_segments(reactions, personas);
    let wasted_spend_alerts = detect_clickbait_traps(&all_performances, policy);

    let clusters = fragment_audience_into_clusters(personas);
    let ad_ids: Vec<AdId> = all_performances.keys().cloned().collect();
    let segment_ownership = assign_segment_owners(&clusters, reactions, &ad_ids);

    let cluster_values: HashMap<&str, f64> = segment_ownership
        .iter()
        .map(|(cluster_id, ownership)| (cluster_id.as_str(), segment_value(ownership)))
        .collect();
    let total_value: f64 = cluster_values.values().sum();

    let mut owned_value: HashMap<&str, f64> = HashMap::new();
    for (cluster_id, ownership) in &segment_ownership {
        *owned_value.entry(ownership.winning_ad.as_str()).or_insert(0.0) +=
            cluster_values[cluster_id.as_str()];
    }

    let shares: BTreeMap<&str, f64> = ad_ids
        .iter()
        .map(|ad_id| {
            let value = owned_value.get(ad_id.as_str()).copied().unwrap_or(0.0);
            let share = if total_value > 0.0 {
                value / total_value * 100.0
            } else {
                0.0
            };
            (ad_id.as_str(), share)
        })
        .collect();

    let selected = select_ads(&shares, &all_performances, max_ads.max(1), policy);
    let budgets = renormalize(&selected.iter().map(|(_, share)| *share).collect::<Vec<_>>());

    let winning_portfolio: Vec<PortfolioRecommendation> = selected
        .iter()
        .zip(budgets)
        .filter_map(|((ad_id, _), budget_split)| {
            let perf = all_performances.get(ad_id)?;

            let mut owned: Vec<(&ClusterId, f64)> = segment_ownership
                .iter()
                .filter(|(_, o)| &o.winning_ad == ad_id)
                .map(|(cluster_id, _)| (cluster_id, cluster_values[cluster_id.as_str()]))
                .collect();
            owned.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

            let primary = owned.first().and_then(|(cluster_id, _)| {
                let ownership = segment_ownership.get(*cluster_id)?;
                let members = clusters.get(*cluster_id)?;
                Some((ownership, members))
            });

            let recommendation = match primary {
                Some((ownership, members)) => {
                    let member_ids: HashSet<&str> =
                        members.iter().map(|p| p.uuid.as_str()).collect();
                    let ad_reactions: Vec<&Reaction> = reactions
                        .iter()
                        .filter(|r| {
                            &r.ad_id == ad_id && member_ids.contains(r.persona_uuid.as_str())
                        })
                        .collect();
                    let descriptor = identify_specific_segment(members, &ad_reactions);
                    let role = assign_role(
                        ownership.trust_score,
                        ownership.conversion_rate,
                        &descriptor.label,
                        perf.click_rate,
                    );
                    PortfolioRecommendation {
                        ad_id: ad_id.clone(),
                        role: role.to_string(),
                        budget_split,
                        target_segment: descriptor.label.clone(),
                        unique_reach: perf.unique_reach,
                        expected_conversions: perf.high_intent_leads,
                        reasoning: Some(ownership.reasoning.clone()),
                        owned_segments: owned.iter().map(|(id, _)| (*id).clone()).collect(),
                        segment: Some(descriptor),
                    }
                }
                None => PortfolioRecommendation {
                    ad_id: ad_id.clone(),
                    role: assign_role(0.0, perf.conversion_rate, GENERAL_SEGMENT, perf.click_rate)
                        .to_string(),
                    budget_split,
                    target_segment: GENERAL_SEGMENT.to_string(),
                    unique_reach: perf.unique_reach,
                    expected_conversions: perf.high_intent_leads,
                    reasoning: None,
                    owned_segments: Vec::new(),
                    segment: None,
                },
            };
            Some(recommendation)
        })
        .collect();

    let cluster_summary: BTreeMap<ClusterId, ClusterInfo> = clusters
        .iter()
        .map(|(cluster_id, members)| {
            let info = ClusterInfo {
                size: members.len(),
                owner: segment_ownership
                    .get(cluster_id)
                    .map(|o| o.winning_ad.clone()),
                value: round_to(
                    cluster_values.get(cluster_id.as_str()).copied().unwrap_or(0.0),
                    2,
                ),
            };
            (cluster_id.clone(), info)
        })
        .collect();

    tracing::info!(
        selected = winning_portfolio.len(),
        owned_clusters = segment_ownership.len(),
        alerts = wasted_spend_alerts.len(),
        "portfolio optimized"
    );

    PortfolioResult {
        winning_portfolio,
        all_performances,
        overlap_matrix,
        audience_segments,
        segment_ownership,
        clusters: cluster_summary,
        wasted_spend_alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_table_precedence() {
        assert_eq!(assign_role(9.0, 80.0, "Senior 50+ Teachers in Kerala", 10.0), "The Trust Magnet");
        assert_eq!(assign_role(5.0, 65.0, "Youth 18-24 Freelancers", 10.0), "The Growth Hook");
        assert_eq!(assign_role(5.0, 75.0, "Middle Age 35-49 Managers", 10.0), "The Converter");
        assert_eq!(assign_role(7.5, 40.0, "High-Income Consumers in Delhi", 10.0), "The Premium Play");
        assert_eq!(assign_role(5.0, 40.0, "Farmers in Rural Areas", 10.0), "The Trust Builder");
        assert_eq!(
            assign_role(5.0, 40.0, "Consumers in Goa (High Tech-Savvy)", 10.0),
            "The Tech-Savvy Performer"
        );
        assert_eq!(assign_role(5.0, 10.0, GENERAL_SEGMENT, 25.0), "The Engager");
        assert_eq!(
            assign_role(5.0, 10.0, "Budget-Conscious Consumers in Bihar", 5.0),
            "The Value Champion"
        );
        assert_eq!(assign_role(5.0, 10.0, GENERAL_SEGMENT, 5.0), DEFAULT_ROLE);
    }

    #[test]
    fn renormalize_sums_to_hundred() {
        let budgets = renormalize(&[33.333, 33.333, 33.334]);
        let total: f64 = budgets.iter().sum();
        assert!((total - 100.0).abs() < 1e-9, "total {total}");
        assert_eq!(budgets[1], 33.3);
    }

    #[test]
    fn renormalize_scales_partial_selection() {
        let budgets = renormalize(&[60.0, 20.0]);
        assert_eq!(budgets, vec![75.0, 25.0]);
    }

    #[test]
    fn renormalize_zero_total_splits_evenly() {
        let budgets = renormalize(&[0.0, 0.0]);
        assert_eq!(budgets, vec![50.0, 50.0]);
        assert!(renormalize(&[]).is_empty());
    }

    #[test]
    fn segment_value_formula() {
        let ownership = SegmentOwnership {
            cluster_id: "Urban_High".to_string(),
            winning_ad: "ad_A".to_string(),
            trust_score: 8.5,
            relevance_score: 8.0,
            conversion_rate: 100.0,
            high_intent_count: 2,
            persona_count: 2,
            reasoning: String::new(),
            all_ad_scores: BTreeMap::new(),
        };
        assert!((segment_value(&ownership) - 13.6).abs() < 1e-9);
    }
}
