//! Engaged-audience tallies per ad across several demographic dimensions.

use std::collections::{BTreeMap, HashMap};

use apriori_core::{AdId, Persona, Reaction};

use crate::clusters::AgeCategory;

fn literacy_band(score: u8) -> &'static str {
    match score {
        8.. => "High",
        5..=7 => "Medium",
        _ => "Low",
    }
}

/// Count engaged personas per ad along four dimensions: zone and income
/// tier, digital literacy band, age band, and primary device.
///
/// Reactions from personas missing in `personas` are skipped.
#[must_use]
pub fn identify_audience_segments(
    reactions: &[Reaction],
    personas: &[Persona],
) -> BTreeMap<AdId, BTreeMap<String, usize>> {
    let persona_map: HashMap<&str, &Persona> =
        personas.iter().map(|p| (p.uuid.as_str(), p)).collect();
    let mut segments: BTreeMap<AdId, BTreeMap<String, usize>> = BTreeMap::new();

    for reaction in reactions.iter().filter(|r| r.is_engaged()) {
        let Some(persona) = persona_map.get(reaction.persona_uuid.as_str()) else {
            continue;
        };

        let keys = [
            format!("{}_{}", persona.zone, persona.purchasing_power_tier),
            format!("Digital_{}", literacy_band(persona.digital_literacy)),
            AgeCategory::from_age(persona.age).key().to_string(),
            format!("Device_{}", persona.primary_device),
        ];

        let counts = segments.entry(reaction.ad_id.clone()).or_default();
        for key in keys {
            *counts.entry(key).or_insert(0) += 1;
        }
    }

    segments
}
