//! Per-ad aggregate metrics and clickbait detection.

use std::collections::{BTreeMap, HashSet};

use apriori_core::{Action, AdId, Reaction};

use crate::math::{ratio, round_to};
use crate::types::{AdPerformance, PortfolioPolicy};

#[derive(Default)]
struct AdTally<'a> {
    impressions: usize,
    clicks: usize,
    high_intent_leads: usize,
    reached: HashSet<&'a str>,
}

/// Aggregate impressions, clicks, high-intent leads, and reach per ad.
///
/// Rates are percentages rounded to two decimals. Reach counts every
/// persona that reacted to the ad, not only engaged ones, so it never
/// exceeds the impression count. Empty input yields an empty map.
#[must_use]
pub fn compute_ad_performance(reactions: &[Reaction]) -> BTreeMap<AdId, AdPerformance> {
    let mut tallies: BTreeMap<&str, AdTally<'_>> = BTreeMap::new();

    for reaction in reactions {
        let tally = tallies.entry(reaction.ad_id.as_str()).or_default();
        tally.impressions += 1;
        if reaction.action == Action::Click {
            tally.clicks += 1;
        }
        if reaction.is_high_intent() {
            tally.high_intent_leads += 1;
        }
        tally.reached.insert(reaction.persona_uuid.as_str());
    }

    tallies
        .into_iter()
        .map(|(ad_id, tally)| {
            let perf = AdPerformance {
                ad_id: ad_id.to_string(),
                total_impressions: tally.impressions,
                clicks: tally.clicks,
                high_intent_leads: tally.high_intent_leads,
                click_rate: round_to(ratio(tally.clicks, tally.impressions) * 100.0, 2),
                conversion_rate: round_to(
                    ratio(tally.high_intent_leads, tally.impressions) * 100.0,
                    2,
                ),
                unique_reach: tally.reached.len(),
            };
            (ad_id.to_string(), perf)
        })
        .collect()
}

/// Flag ads that attract curiosity clicks without purchase intent.
///
/// An ad is a trap when its click rate is strictly above
/// `policy.clickbait_min_click_rate` and its conversion rate is strictly
/// below `policy.clickbait_max_conversion_rate`.
#[must_use]
pub fn detect_clickbait_traps(
    performances: &BTreeMap<AdId, AdPerformance>,
    policy: &PortfolioPolicy,
) -> Vec<String> {
    performances
        .values()
        .filter(|perf| {
            perf.click_rate > policy.clickbait_min_click_rate
                && perf.conversion_rate < policy.clickbait_max_conversion_rate
        })
        .map(|perf| {
            tracing::info!(
                ad_id = %perf.ad_id,
                click_rate = perf.click_rate,
                conversion_rate = perf.conversion_rate,
                "clickbait trap detected"
            );
            format!(
                "Ad {} has {}% click rate but only {}% high-intent conversion. \
                 This is a 'Clickbait Trap' - generating curiosity clicks without real purchase intent.",
                perf.ad_id, perf.click_rate, perf.conversion_rate
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use apriori_core::IntentLevel;

    use super::*;

    fn reaction(persona: &str, ad: &str, action: Action, intent: IntentLevel) -> Reaction {
        Reaction {
            persona_uuid: persona.to_string(),
            ad_id: ad.to_string(),
            trust_score: 5,
            relevance_score: 5,
            action,
            intent_level: intent,
            reasoning: None,
            emotional_response: None,
            barriers: vec![],
        }
    }

    #[test]
    fn empty_input_yields_empty_map() {
        assert!(compute_ad_performance(&[]).is_empty());
    }

    #[test]
    fn counts_clicks_leads_and_reach() {
        let reactions = vec![
            reaction("p1", "ad_1", Action::Click, IntentLevel::High),
            reaction("p2", "ad_1", Action::Ignore, IntentLevel::Low),
            reaction("p3", "ad_1", Action::Click, IntentLevel::Medium),
            reaction("p1", "ad_2", Action::Report, IntentLevel::None),
        ];
        let perf = compute_ad_performance(&reactions);

        let ad_1 = &perf["ad_1"];
        assert_eq!(ad_1.total_impressions, 3);
        assert_eq!(ad_1.clicks, 2);
        assert_eq!(ad_1.high_intent_leads, 1);
        assert_eq!(ad_1.unique_reach, 3);
        assert!((ad_1.click_rate - 66.67).abs() < 1e-9);
        assert!((ad_1.conversion_rate - 33.33).abs() < 1e-9);

        let ad_2 = &perf["ad_2"];
        assert_eq!(ad_2.clicks, 0);
        assert_eq!(ad_2.click_rate, 0.0);
        assert_eq!(ad_2.unique_reach, 1);
    }

    #[test]
    fn repeated_persona_counts_once_for_reach() {
        let reactions = vec![
            reaction("p1", "ad_1", Action::Click, IntentLevel::High),
            reaction("p1", "ad_1", Action::Ignore, IntentLevel::Low),
        ];
        let perf = compute_ad_performance(&reactions);
        assert_eq!(perf["ad_1"].total_impressions, 2);
        assert_eq!(perf["ad_1"].unique_reach, 1);
    }

    fn performance(ad_id: &str, click_rate: f64, conversion_rate: f64) -> AdPerformance {
        AdPerformance {
            ad_id: ad_id.to_string(),
            total_impressions: 100,
            clicks: 0,
            high_intent_leads: 0,
            click_rate,
            conversion_rate,
            unique_reach: 100,
        }
    }

    #[test]
    fn clickbait_requires_both_thresholds() {
        let mut perfs = BTreeMap::new();
        perfs.insert("bait".to_string(), performance("bait", 20.0, 3.0));
        perfs.insert("honest".to_string(), performance("honest", 20.0, 12.0));
        perfs.insert("quiet".to_string(), performance("quiet", 10.0, 1.0));

        let alerts = detect_clickbait_traps(&perfs, &PortfolioPolicy::default());
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("bait"));
        assert!(alerts[0].contains("20% click rate"));
        assert!(alerts[0].contains("3% high-intent"));
    }

    #[test]
    fn clickbait_thresholds_are_exclusive() {
        let mut perfs = BTreeMap::new();
        perfs.insert("edge".to_string(), performance("edge", 15.0, 4.0));
        perfs.insert("edge2".to_string(), performance("edge2", 16.0, 5.0));
        assert!(detect_clickbait_traps(&perfs, &PortfolioPolicy::default()).is_empty());
    }
}
