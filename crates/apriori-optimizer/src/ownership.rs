//! Per-cluster winner selection by composite score.

use std::collections::{BTreeMap, HashSet};

use apriori_core::{AdId, ClusterId, Persona, Reaction};

use crate::math::{mean, ratio, round_to};
use crate::types::SegmentOwnership;

/// High-intent leads beyond this count earn no further volume bonus.
const VOLUME_BONUS_CAP: usize = 10;

/// Stats for one ad restricted to one cluster's personas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ClusterAdStats {
    pub reactions: usize,
    pub high_intent: usize,
    pub avg_trust: f64,
    pub avg_relevance: f64,
}

impl ClusterAdStats {
    pub(crate) fn collect<'r>(reactions: impl IntoIterator<Item = &'r Reaction>) -> Self {
        let matching: Vec<&Reaction> = reactions.into_iter().collect();
        Self {
            reactions: matching.len(),
            high_intent: matching.iter().filter(|r| r.is_high_intent()).count(),
            avg_trust: mean(matching.iter().map(|r| f64::from(r.trust_score))),
            avg_relevance: mean(matching.iter().map(|r| f64::from(r.relevance_score))),
        }
    }

    /// High-intent share in `0.0..=1.0`.
    pub(crate) fn conversion_fraction(&self) -> f64 {
        ratio(self.high_intent, self.reactions)
    }

    /// `avg_trust * avg_relevance * conversion%`, boosted by up to 50% for
    /// lead volume. Zero when there are no matching reactions.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn composite_score(&self) -> f64 {
        if self.reactions == 0 {
            return 0.0;
        }
        let intensity = self.avg_trust * self.avg_relevance * (self.conversion_fraction() * 100.0);
        let volume_bonus = self.high_intent.min(VOLUME_BONUS_CAP) as f64;
        intensity * (1.0 + volume_bonus / 20.0)
    }
}

/// Determine which ad dominates each cluster.
///
/// Each ad is scored on the reactions of the cluster's personas only. The
/// highest score wins; on a tie the ad listed first in `ad_ids` keeps the
/// cluster. Clusters whose best score is zero are left out entirely.
#[must_use]
pub fn assign_segment_owners(
    clusters: &BTreeMap<ClusterId, Vec<&Persona>>,
    reactions: &[Reaction],
    ad_ids: &[AdId],
) -> BTreeMap<ClusterId, SegmentOwnership> {
    let mut owners = BTreeMap::new();

    for (cluster_id, members) in clusters {
        let member_ids: HashSet<&str> = members.iter().map(|p| p.uuid.as_str()).collect();

        let mut all_ad_scores = BTreeMap::new();
        let mut best: Option<(&AdId, ClusterAdStats, f64)> = None;

        for ad_id in ad_ids {
            let stats = ClusterAdStats::collect(reactions.iter().filter(|r| {
                r.ad_id == *ad_id && member_ids.contains(r.persona_uuid.as_str())
            }));
            let score = stats.composite_score();
            all_ad_scores.insert(ad_id.clone(), round_to(score, 2));

            if best.as_ref().is_none_or(|(_, _, top)| score > *top) {
                best = Some((ad_id, stats, score));
            }
        }

        let Some((winning_ad, stats, score)) = best else {
            continue;
        };
        if score <= 0.0 {
            tracing::debug!(cluster = %cluster_id, "no ad has signal in cluster; leaving unowned");
            continue;
        }

        let conversion_rate = round_to(stats.conversion_fraction() * 100.0, 1);
        let ownership = SegmentOwnership {
            cluster_id: cluster_id.clone(),
            winning_ad: winning_ad.clone(),
            trust_score: round_to(stats.avg_trust, 1),
            relevance_score: round_to(stats.avg_relevance, 1),
            conversion_rate,
            high_intent_count: stats.high_intent,
            persona_count: members.len(),
            reasoning: ownership_reasoning(stats.avg_trust, conversion_rate),
            all_ad_scores,
        };
        owners.insert(cluster_id.clone(), ownership);
    }

    owners
}

/// Short justification for a cluster win built from a fixed rule table.
fn ownership_reasoning(avg_trust: f64, conversion_rate: f64) -> String {
    let mut reasons = Vec::new();
    if avg_trust >= 8.0 {
        reasons.push("High trust signals".to_string());
    }
    if conversion_rate >= 70.0 {
        reasons.push(format!("{conversion_rate:.0}% conversion rate"));
    } else if conversion_rate >= 50.0 {
        reasons.push(format!("Strong {conversion_rate:.0}% conversion"));
    }

    if reasons.is_empty() {
        "Best performing ad for this segment".to_string()
    } else {
        reasons.join(" • ")
    }
}
