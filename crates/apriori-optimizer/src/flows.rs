//! Drop-off analysis and ranking for simulated multi-screen flows.
//!
//! Each flow's journeys reduce to a completion rate, the view where most
//! personas left, and the dominant reason for leaving at that view. Free-text
//! reasons are grouped through an ordered keyword table before counting, so
//! "premium is too high" and "cost seems steep" land in the same bucket.

use std::collections::BTreeMap;

use apriori_core::{FlowId, FlowJourney};
use serde::{Deserialize, Serialize};

use crate::math::{ratio, round_to};

/// Flows completing below this rate (percent) are told to simplify.
pub const HEALTHY_COMPLETION_PCT: f64 = 80.0;

/// Drops at a single view needed for it to count as a friction point.
pub const FRICTION_POINT_MIN_DROPS: usize = 2;

const UNKNOWN_REASON: &str = "Unknown";
const REASON_KEY_MAX_CHARS: usize = 80;

struct ReasonRule {
    /// Every term must appear.
    all: &'static [&'static str],
    /// At least one term must appear, unless empty.
    any: &'static [&'static str],
    key: &'static str,
}

impl ReasonRule {
    fn matches(&self, lower: &str) -> bool {
        self.all.iter().all(|term| lower.contains(term))
            && (self.any.is_empty() || self.any.iter().any(|term| lower.contains(term)))
    }
}

/// Evaluated top to bottom against the lowercased reason.
const REASON_RULES: &[ReasonRule] = &[
    ReasonRule {
        all: &["optional", "value"],
        any: &[],
        key: "Optional step - unclear value",
    },
    ReasonRule {
        all: &["optional"],
        any: &[],
        key: "Optional step - chose to skip",
    },
    ReasonRule {
        all: &[],
        any: &["premium", "price", "cost"],
        key: "Price/premium concerns",
    },
    ReasonRule {
        all: &[],
        any: &["overwhelm", "too much", "complex"],
        key: "Information overload / complexity",
    },
    ReasonRule {
        all: &["time"],
        any: &["need", "think", "later"],
        key: "Need more time to decide",
    },
    ReasonRule {
        all: &[],
        any: &["spouse", "family", "discuss"],
        key: "Need to discuss with family",
    },
    ReasonRule {
        all: &[],
        any: &["trust", "skeptical"],
        key: "Trust / legitimacy concerns",
    },
    ReasonRule {
        all: &[],
        any: &["inertia", "lazy", "don't need"],
        key: "Low motivation / inertia",
    },
    ReasonRule {
        all: &["mandatory", "lengthy"],
        any: &[],
        key: "Flow too lengthy",
    },
    ReasonRule {
        all: &[],
        any: &["error", "technical"],
        key: "Technical/UX friction",
    },
];

/// A normalized drop-off reason and how many journeys gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasonCount {
    pub reason: String,
    pub count: usize,
}

/// Where and why personas abandoned one flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropOffAnalysis {
    pub flow_id: FlowId,
    pub flow_name: String,
    pub total_personas: usize,
    pub completed_count: usize,
    /// Every journey that did not complete, including those with no recorded view.
    pub dropped_count: usize,
    /// Percentage, rounded to two decimals.
    pub completion_rate: f64,
    pub drop_off_by_view: BTreeMap<u32, usize>,
    /// Raw reasons as given, in journey order. Missing reasons read `"Unknown"`.
    pub drop_off_reasons_by_view: BTreeMap<u32, Vec<String>>,
    pub dominant_drop_off_view: Option<u32>,
    pub dominant_drop_off_reason: Option<String>,
    /// Journeys at the dominant view that gave the dominant reason.
    pub dominant_reason_count: usize,
    /// Normalized reasons at the dominant view, most common first.
    pub dominant_view_reasons: Vec<ReasonCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRanking {
    pub flow_id: FlowId,
    pub flow_name: String,
    pub completion_rate: f64,
    pub completed: usize,
    pub dropped: usize,
    pub dominant_drop_off_view: Option<u32>,
    pub dominant_drop_off_reason: Option<String>,
}

/// Outcome of ranking several flows against each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowComparisonResult {
    /// `None` when there were no flows to compare.
    pub winning_flow_id: Option<FlowId>,
    pub winning_flow_name: Option<String>,
    pub winning_completion_rate: f64,
    /// Highest completion rate first.
    pub flow_rankings: Vec<FlowRanking>,
    pub per_flow_analysis: BTreeMap<FlowId, DropOffAnalysis>,
    pub improvement_recommendations: BTreeMap<FlowId, Vec<String>>,
    pub why_winner_wins: String,
}

/// Collapse a free-text drop-off reason into a grouping key.
///
/// Blank reasons become `"Unknown"`. Reasons no rule recognizes are kept
/// verbatim, cut to 80 characters with a trailing `...`.
#[must_use]
pub fn normalize_drop_off_reason(reason: &str) -> String {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return UNKNOWN_REASON.to_string();
    }

    let lower = trimmed.to_lowercase();
    if let Some(rule) = REASON_RULES.iter().find(|rule| rule.matches(&lower)) {
        return rule.key.to_string();
    }

    let mut key: String = trimmed.chars().take(REASON_KEY_MAX_CHARS).collect();
    if trimmed.chars().count() > REASON_KEY_MAX_CHARS {
        key.push_str("...");
    }
    key
}

/// Tally normalized reasons, most common first. Ties keep first-seen order.
fn rank_reasons<'a, I>(reasons: I) -> Vec<ReasonCount>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut ranked: Vec<ReasonCount> = Vec::new();
    for raw in reasons {
        let reason = normalize_drop_off_reason(raw);
        match ranked.iter_mut().find(|rc| rc.reason == reason) {
            Some(rc) => rc.count += 1,
            None => ranked.push(ReasonCount { reason, count: 1 }),
        }
    }
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Analyze one flow's journeys.
///
/// The dominant view is the one with the most drop-offs, the lowest view
/// number winning ties. Its dominant reason is the most common normalized
/// reason among the journeys that left there.
#[must_use]
pub fn analyze_flow_drop_offs(
    flow_id: &str,
    flow_name: &str,
    journeys: &[FlowJourney],
) -> DropOffAnalysis {
    let total = journeys.len();
    let completed = journeys.iter().filter(|j| j.completed_flow).count();

    let mut drop_off_by_view: BTreeMap<u32, usize> = BTreeMap::new();
    let mut drop_off_reasons_by_view: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for journey in journeys {
        let Some(view) = journey.dropped_off_at_view else {
            continue;
        };
        *drop_off_by_view.entry(view).or_insert(0) += 1;
        let reason = journey
            .drop_off_reason
            .clone()
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_REASON.to_string());
        drop_off_reasons_by_view.entry(view).or_default().push(reason);
    }

    let mut dominant_view: Option<(u32, usize)> = None;
    for (&view, &count) in &drop_off_by_view {
        if dominant_view.is_none_or(|(_, top)| count > top) {
            dominant_view = Some((view, count));
        }
    }

    let dominant_view_reasons = dominant_view
        .and_then(|(view, _)| drop_off_reasons_by_view.get(&view))
        .map(rank_reasons)
        .unwrap_or_default();
    let top_reason = dominant_view_reasons.first();

    let analysis = DropOffAnalysis {
        flow_id: flow_id.to_string(),
        flow_name: flow_name.to_string(),
        total_personas: total,
        completed_count: completed,
        dropped_count: total - completed,
        completion_rate: round_to(ratio(completed, total) * 100.0, 2),
        drop_off_by_view,
        drop_off_reasons_by_view,
        dominant_drop_off_view: dominant_view.map(|(view, _)| view),
        dominant_drop_off_reason: top_reason.map(|rc| rc.reason.clone()),
        dominant_reason_count: top_reason.map_or(0, |rc| rc.count),
        dominant_view_reasons,
    };

    tracing::debug!(
        flow_id,
        total,
        completed,
        dominant_view = ?analysis.dominant_drop_off_view,
        "analyzed flow drop-offs"
    );
    analysis
}

fn recommendations_for(analysis: &DropOffAnalysis) -> Vec<String> {
    let mut recs = Vec::new();

    if let (Some(view), Some(reason)) = (
        analysis.dominant_drop_off_view,
        analysis.dominant_drop_off_reason.as_deref(),
    ) {
        recs.push(format!("Address dominant drop-off at View {view}: {reason}"));
    }

    if analysis.completion_rate < HEALTHY_COMPLETION_PCT {
        recs.push(format!(
            "Overall completion is {:.1}% - consider simplifying mandatory steps or adding progress indicators.",
            analysis.completion_rate
        ));
    }

    let friction_views: Vec<String> = analysis
        .drop_off_by_view
        .iter()
        .filter(|(_, count)| **count >= FRICTION_POINT_MIN_DROPS)
        .map(|(view, _)| view.to_string())
        .collect();
    if friction_views.len() > 1 {
        recs.push(format!(
            "Multiple friction points (Views {}) - prioritize the highest drop-off first.",
            friction_views.join(", ")
        ));
    }

    recs
}

fn explain_winner(winner: &DropOffAnalysis, runner_up: Option<&DropOffAnalysis>) -> String {
    let mut parts = vec![format!(
        "{} achieves {:.1}% completion rate.",
        winner.flow_name, winner.completion_rate
    )];

    if let (Some(view), Some(reason)) = (
        winner.dominant_drop_off_view,
        winner.dominant_drop_off_reason.as_deref(),
    ) {
        parts.push(format!("Its main drop-off point is View {view} (reason: {reason})."));
    }

    if let Some(next) = runner_up {
        parts.push(format!(
            "Beats next best flow by {:.1} percentage points.",
            winner.completion_rate - next.completion_rate
        ));
    }

    parts.join(" ")
}

/// Analyze and rank every flow by completion rate.
///
/// Flows missing from `flow_names` are labelled with their id. Equal
/// completion rates keep flow-id order. Never fails; no flows yields no
/// winner and an "Insufficient data." explanation.
#[must_use]
pub fn compare_flows(
    flow_results: &BTreeMap<FlowId, Vec<FlowJourney>>,
    flow_names: &BTreeMap<FlowId, String>,
) -> FlowComparisonResult {
    let per_flow_analysis: BTreeMap<FlowId, DropOffAnalysis> = flow_results
        .iter()
        .map(|(flow_id, journeys)| {
            let name = flow_names.get(flow_id).map_or(flow_id.as_str(), String::as_str);
            (flow_id.clone(), analyze_flow_drop_offs(flow_id, name, journeys))
        })
        .collect();

    let mut ranked: Vec<&DropOffAnalysis> = per_flow_analysis.values().collect();
    ranked.sort_by(|a, b| b.completion_rate.total_cmp(&a.completion_rate));

    let flow_rankings: Vec<FlowRanking> = ranked
        .iter()
        .map(|a| FlowRanking {
            flow_id: a.flow_id.clone(),
            flow_name: a.flow_name.clone(),
            completion_rate: a.completion_rate,
            completed: a.completed_count,
            dropped: a.dropped_count,
            dominant_drop_off_view: a.dominant_drop_off_view,
            dominant_drop_off_reason: a.dominant_drop_off_reason.clone(),
        })
        .collect();

    let improvement_recommendations: BTreeMap<FlowId, Vec<String>> = per_flow_analysis
        .iter()
        .map(|(flow_id, analysis)| (flow_id.clone(), recommendations_for(analysis)))
        .collect();

    let winner = ranked.first().copied();
    let why_winner_wins = winner.map_or_else(
        || "Insufficient data.".to_string(),
        |w| explain_winner(w, ranked.get(1).copied()),
    );

    if let Some(w) = winner {
        tracing::info!(
            flow_id = %w.flow_id,
            completion_rate = w.completion_rate,
            flows = ranked.len(),
            "flow comparison complete"
        );
    }

    FlowComparisonResult {
        winning_flow_id: winner.map(|w| w.flow_id.clone()),
        winning_flow_name: winner.map(|w| w.flow_name.clone()),
        winning_completion_rate: winner.map_or(0.0, |w| w.completion_rate),
        flow_rankings,
        improvement_recommendations,
        why_winner_wins,
        per_flow_analysis,
    }
}

#[cfg(test)]
#[path = "flows_test.rs"]
mod tests;
