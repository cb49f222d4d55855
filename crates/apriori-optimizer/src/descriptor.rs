//! "Oddly specific" descriptions of the personas a winning ad dominates.

use apriori_core::{Persona, PurchasingPowerTier, Reaction};

use crate::clusters::{categorize_occupation, AgeCategory};
use crate::math::{mean, ratio, round_to};
use crate::types::{Concentration, SegmentDescriptor};

/// Label used when a cluster has no personas to describe.
const EMPTY_SEGMENT_LABEL: &str = "General Audience";

/// Age-band and occupation qualifiers need a plurality above this share.
const PLURALITY_PCT: f64 = 40.0;
/// Geographic and income qualifiers need a majority above this share.
const MAJORITY_PCT: f64 = 50.0;

/// Most frequent value and its share, in percent. Ties go to the value seen
/// first.
#[allow(clippy::cast_precision_loss)]
fn mode<I>(values: I) -> Concentration
where
    I: IntoIterator<Item = String>,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut total = 0_usize;
    for value in values {
        total += 1;
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(String, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().is_none_or(|(_, top)| count > *top) {
            best = Some((value, count));
        }
    }

    match best {
        Some((value, count)) => Concentration {
            value,
            percentage: round_to(ratio(count, total) * 100.0, 1),
        },
        None => Concentration {
            value: "Unknown".to_string(),
            percentage: 0.0,
        },
    }
}

/// Plural occupation noun: the category name when one matches, otherwise the
/// raw title with an `s`.
fn simplify_occupation(occupation: &str) -> String {
    categorize_occupation(occupation).map_or_else(
        || format!("{}s", occupation.trim()),
        |category| category.plural().to_string(),
    )
}

fn income_qualifier(tier: &str) -> Option<&'static str> {
    if tier == PurchasingPowerTier::High.to_string() {
        Some("High-Income")
    } else if tier == PurchasingPowerTier::Low.to_string() {
        Some("Budget-Conscious")
    } else {
        None
    }
}

fn tech_qualifier(avg_literacy: f64) -> Option<&'static str> {
    if avg_literacy >= 8.0 {
        Some("High Tech-Savvy")
    } else if avg_literacy >= 6.0 {
        Some("Tech-Comfortable")
    } else if avg_literacy <= 4.0 {
        Some("Low Digital Literacy")
    } else {
        None
    }
}

/// Describe a cluster's personas statistically and give them a readable label.
///
/// `reactions` should be the winning ad's reactions from these personas; they
/// only feed the average trust score.
#[must_use]
pub fn identify_specific_segment(personas: &[&Persona], reactions: &[&Reaction]) -> SegmentDescriptor {
    let state = mode(personas.iter().map(|p| p.state.clone()));
    let occupation = mode(personas.iter().map(|p| p.occupation.clone()));
    let zone = mode(personas.iter().map(|p| p.zone.to_string()));
    let age_category = mode(
        personas
            .iter()
            .map(|p| AgeCategory::from_age(p.age).key().to_string()),
    );
    let income_tier = mode(personas.iter().map(|p| p.purchasing_power_tier.to_string()));

    let avg_digital_literacy = mean(personas.iter().map(|p| f64::from(p.digital_literacy)));
    let avg_trust_score = mean(reactions.iter().map(|r| f64::from(r.trust_score)));

    let confidence = round_to(
        mean([
            state.percentage,
            occupation.percentage,
            zone.percentage,
            age_category.percentage,
            income_tier.percentage,
        ]) / 100.0,
        2,
    );

    let label = if personas.is_empty() {
        EMPTY_SEGMENT_LABEL.to_string()
    } else {
        build_label(
            &state,
            &occupation,
            &zone,
            &age_category,
            &income_tier,
            avg_digital_literacy,
        )
    };

    SegmentDescriptor {
        label,
        state,
        occupation,
        zone,
        age_category,
        income_tier,
        avg_digital_literacy: round_to(avg_digital_literacy, 1),
        avg_trust_score: round_to(avg_trust_score, 1),
        persona_count: personas.len(),
        confidence,
    }
}

fn build_label(
    state: &Concentration,
    occupation: &Concentration,
    zone: &Concentration,
    age_category: &Concentration,
    income_tier: &Concentration,
    avg_digital_literacy: f64,
) -> String {
    let mut qualifiers: Vec<String> = Vec::new();
    if income_tier.percentage > MAJORITY_PCT {
        if let Some(income) = income_qualifier(&income_tier.value) {
            qualifiers.push(income.to_string());
        }
    }

    let mut nouns: Vec<String> = Vec::new();
    if age_category.percentage > PLURALITY_PCT {
        nouns.push(age_category.value.replace('_', " "));
    }
    if occupation.percentage > PLURALITY_PCT {
        nouns.push(simplify_occupation(&occupation.value));
    }

    let geo = if state.percentage > MAJORITY_PCT {
        Some(format!("in {}", state.value))
    } else if zone.percentage > MAJORITY_PCT {
        Some(format!("in {} Areas", zone.value))
    } else {
        None
    };

    let tech = tech_qualifier(avg_digital_literacy);

    if qualifiers.is_empty() && nouns.is_empty() && geo.is_none() && tech.is_none() {
        return format!("{}s in {} Areas", occupation.value.trim(), zone.value);
    }

    if nouns.is_empty() {
        nouns.push("Consumers".to_string());
    }

    let mut parts = qualifiers;
    parts.extend(nouns);
    parts.extend(geo);
    if let Some(tech) = tech {
        parts.push(format!("({tech})"));
    }
    parts.join(" ")
}
