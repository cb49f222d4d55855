//! Directional audience overlap between ads.

use std::collections::{BTreeMap, HashSet};

use apriori_core::{AdId, Reaction};

use crate::math::{ratio, round_to};

/// Pairwise audience overlap between every ad with an engaged audience.
///
/// An ad's engaged audience is the set of personas that clicked it or showed
/// medium/high intent. `overlap[a][b]` is the fraction of `a`'s engaged
/// audience that is also engaged by `b`, rounded to three decimals. The
/// matrix is not symmetric: it is normalized by `a`'s audience only.
/// The diagonal is always `1.0`.
#[must_use]
pub fn compute_audience_overlap(reactions: &[Reaction]) -> BTreeMap<AdId, BTreeMap<AdId, f64>> {
    let mut audiences: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();
    for reaction in reactions.iter().filter(|r| r.is_engaged()) {
        audiences
            .entry(reaction.ad_id.as_str())
            .or_default()
            .insert(reaction.persona_uuid.as_str());
    }

    audiences
        .iter()
        .map(|(&ad_a, audience_a)| {
            let row = audiences
                .iter()
                .map(|(&ad_b, audience_b)| {
                    let overlap = if ad_a == ad_b {
                        1.0
                    } else {
                        let shared = audience_a.intersection(audience_b).count();
                        round_to(ratio(shared, audience_a.len()), 3)
                    };
                    (ad_b.to_string(), overlap)
                })
                .collect();
            (ad_a.to_string(), row)
        })
        .collect()
}
