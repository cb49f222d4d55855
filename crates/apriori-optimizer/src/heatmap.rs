//! Zone × income-tier conversion heatmap for the report UI.

use std::collections::{BTreeMap, HashMap};

use apriori_core::{AdId, Persona, PurchasingPowerTier, Reaction, Zone};
use serde::{Deserialize, Serialize};

use crate::math::ratio;

/// Row label used when no engaged segment is found.
pub const NO_DATA_ROW: &str = "No_Data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeatmapCell {
    Strong,
    Medium,
    Weak,
    Poor,
    NoData,
}

impl HeatmapCell {
    /// Bucket a conversion fraction (`0.0..=1.0`).
    #[must_use]
    pub fn from_conversion(fraction: f64) -> Self {
        if fraction >= 0.30 {
            HeatmapCell::Strong
        } else if fraction >= 0.15 {
            HeatmapCell::Medium
        } else if fraction >= 0.05 {
            HeatmapCell::Weak
        } else {
            HeatmapCell::Poor
        }
    }

    /// Single-character glyph for terminal rendering.
    #[must_use]
    pub fn glyph(self) -> char {
        match self {
            HeatmapCell::Strong => '#',
            HeatmapCell::Medium => '+',
            HeatmapCell::Weak => '-',
            HeatmapCell::Poor => 'x',
            HeatmapCell::NoData => '.',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub rows: Vec<String>,
    pub cols: Vec<AdId>,
    pub matrix: Vec<Vec<HeatmapCell>>,
}

/// Build the segment-by-ad conversion heatmap.
///
/// Rows are the `{Zone}_{Tier}` segments that have at least one engaged
/// reaction, sorted by name; columns follow `ad_ids`. A cell is `no_data`
/// when the segment never saw the ad.
#[must_use]
pub fn generate_heatmap_matrix(
    reactions: &[Reaction],
    personas: &[Persona],
    ad_ids: &[AdId],
) -> Heatmap {
    let persona_map: HashMap<&str, &Persona> =
        personas.iter().map(|p| (p.uuid.as_str(), p)).collect();

    let segments: BTreeMap<String, (Zone, PurchasingPowerTier)> = reactions
        .iter()
        .filter(|r| r.is_engaged())
        .filter_map(|r| persona_map.get(r.persona_uuid.as_str()))
        .map(|p| {
            (
                format!("{}_{}", p.zone, p.purchasing_power_tier),
                (p.zone, p.purchasing_power_tier),
            )
        })
        .collect();

    if segments.is_empty() {
        return Heatmap {
            rows: vec![NO_DATA_ROW.to_string()],
            cols: ad_ids.to_vec(),
            matrix: vec![vec![HeatmapCell::NoData; ad_ids.len()]],
        };
    }

    let matrix: Vec<Vec<HeatmapCell>> = segments
        .values()
        .map(|&(zone, tier)| {
            ad_ids
                .iter()
                .map(|ad_id| {
                    let matching: Vec<&Reaction> = reactions
                        .iter()
                        .filter(|r| &r.ad_id == ad_id)
                        .filter(|r| {
                            persona_map.get(r.persona_uuid.as_str()).is_some_and(|p| {
                                p.zone == zone && p.purchasing_power_tier == tier
                            })
                        })
                        .collect();
                    if matching.is_empty() {
                        return HeatmapCell::NoData;
                    }
                    let high = matching.iter().filter(|r| r.is_high_intent()).count();
                    HeatmapCell::from_conversion(ratio(high, matching.len()))
                })
                .collect::<Vec<_>>()
        })
        .collect();

    Heatmap {
        rows: segments.into_keys().collect(),
        cols: ad_ids.to_vec(),
        matrix,
    }
}

#[cfg(test)]
mod tests {
    use apriori_core::{Action, Device, IntentLevel};

    use super::*;

    fn persona(uuid: &str, zone: Zone, tier: PurchasingPowerTier) -> Persona {
        Persona {
            uuid: uuid.to_string(),
            occupation: "Clerk".to_string(),
            state: "Odisha".to_string(),
            zone,
            age: 38,
            digital_literacy: 5,
            purchasing_power_tier: tier,
            primary_device: Device::Android,
            sex: None,
            district: None,
            scam_vulnerability: None,
            monthly_income_inr: None,
        }
    }

    fn reaction(persona: &str, ad: &str, action: Action, intent: IntentLevel) -> Reaction {
        Reaction {
            persona_uuid: persona.to_string(),
            ad_id: ad.to_string(),
            trust_score: 6,
            relevance_score: 6,
            action,
            intent_level: intent,
            reasoning: None,
            emotional_response: None,
            barriers: vec![],
        }
    }

    #[test]
    fn conversion_buckets() {
        assert_eq!(HeatmapCell::from_conversion(0.30), HeatmapCell::Strong);
        assert_eq!(HeatmapCell::from_conversion(0.15), HeatmapCell::Medium);
        assert_eq!(HeatmapCell::from_conversion(0.05), HeatmapCell::Weak);
        assert_eq!(HeatmapCell::from_conversion(0.049), HeatmapCell::Poor);
    }

    #[test]
    fn cells_serialize_as_snake_case() {
        let json = serde_json::to_value(HeatmapCell::NoData).unwrap();
        assert_eq!(json, serde_json::json!("no_data"));
    }

    #[test]
    fn empty_input_yields_no_data_row() {
        let ads = vec!["ad_1".to_string(), "ad_2".to_string()];
        let heatmap = generate_heatmap_matrix(&[], &[], &ads);
        assert_eq!(heatmap.rows, vec![NO_DATA_ROW.to_string()]);
        assert_eq!(heatmap.matrix, vec![vec![HeatmapCell::NoData, HeatmapCell::NoData]]);
    }

    #[test]
    fn rows_are_sorted_and_cells_bucketed() {
        let personas = vec![
            persona("u1", Zone::Urban, PurchasingPowerTier::High),
            persona("u2", Zone::Urban, PurchasingPowerTier::High),
            persona("r1", Zone::Rural, PurchasingPowerTier::Low),
        ];
        let reactions = vec![
            reaction("u1", "ad_1", Action::Click, IntentLevel::High),
            reaction("u2", "ad_1", Action::Ignore, IntentLevel::Low),
            reaction("r1", "ad_1", Action::Click, IntentLevel::Low),
        ];
        let ads = vec!["ad_1".to_string(), "ad_2".to_string()];

        let heatmap = generate_heatmap_matrix(&reactions, &personas, &ads);
        assert_eq!(heatmap.rows, vec!["Rural_Low".to_string(), "Urban_High".to_string()]);
        assert_eq!(heatmap.matrix[0], vec![HeatmapCell::Poor, HeatmapCell::NoData]);
        assert_eq!(heatmap.matrix[1], vec![HeatmapCell::Strong, HeatmapCell::NoData]);
    }
}
