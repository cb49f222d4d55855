//! Loading persona, reaction, ad-context, and flow-journey datasets from disk.
//!
//! Files are JSON or YAML, selected by extension. Loaded records are
//! validated for shape (score ranges, non-empty identifiers, unique persona
//! uuids) but not for referential integrity: a reaction pointing at an
//! unknown persona is left for the optimizer to skip.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{AdContext, AdId, DatasetError, FlowId, FlowJourney, Persona, Reaction};

const MAX_SCORE: u8 = 10;

/// Load and validate a persona list.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed, or if a
/// persona has an empty or duplicate uuid or an out-of-range literacy score.
pub fn load_personas(path: &Path) -> Result<Vec<Persona>, DatasetError> {
    let personas: Vec<Persona> = read_dataset(path)?;
    validate_personas(&personas)?;
    Ok(personas)
}

/// Load and validate a reaction list.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed, or if a
/// reaction has empty identifiers or out-of-range scores.
pub fn load_reactions(path: &Path) -> Result<Vec<Reaction>, DatasetError> {
    let reactions: Vec<Reaction> = read_dataset(path)?;
    validate_reactions(&reactions)?;
    Ok(reactions)
}

/// Load a map of `ad_id` to creative context.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed.
pub fn load_ad_contexts(path: &Path) -> Result<BTreeMap<AdId, AdContext>, DatasetError> {
    read_dataset(path)
}

/// Load flow simulation results: `flow_id` to the journeys recorded for it.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed, or if a
/// journey has an empty persona uuid or is marked complete while naming a
/// drop-off view.
pub fn load_flow_results(
    path: &Path,
) -> Result<BTreeMap<FlowId, Vec<FlowJourney>>, DatasetError> {
    let results: BTreeMap<FlowId, Vec<FlowJourney>> = read_dataset(path)?;
    validate_flow_results(&results)?;
    Ok(results)
}

/// Load display names keyed by `flow_id`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file cannot be read or parsed.
pub fn load_flow_names(path: &Path) -> Result<BTreeMap<FlowId, String>, DatasetError> {
    read_dataset(path)
}

fn read_dataset<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let display = path.display().to_string();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
        path: display.clone(),
        source: e,
    })?;

    match extension.as_deref() {
        Some("json") => serde_json::from_str(&content).map_err(|e| DatasetError::Json {
            path: display,
            source: e,
        }),
        Some("yaml" | "yml") => serde_yaml::from_str(&content).map_err(|e| DatasetError::Yaml {
            path: display,
            source: e,
        }),
        _ => Err(DatasetError::UnsupportedFormat { path: display }),
    }
}

pub(crate) fn validate_personas(personas: &[Persona]) -> Result<(), DatasetError> {
    let mut seen = HashSet::new();

    for persona in personas {
        if persona.uuid.trim().is_empty() {
            return Err(DatasetError::Validation(
                "persona uuid must be non-empty".to_string(),
            ));
        }

        if persona.digital_literacy > MAX_SCORE {
            return Err(DatasetError::Validation(format!(
                "persona '{}' has digital_literacy {}; must be 0-{MAX_SCORE}",
                persona.uuid, persona.digital_literacy
            )));
        }

        if !seen.insert(persona.uuid.as_str()) {
            return Err(DatasetError::Validation(format!(
                "duplicate persona uuid: '{}'",
                persona.uuid
            )));
        }
    }

    Ok(())
}

pub(crate) fn validate_reactions(reactions: &[Reaction]) -> Result<(), DatasetError> {
    for (idx, reaction) in reactions.iter().enumerate() {
        if reaction.persona_uuid.trim().is_empty() || reaction.ad_id.trim().is_empty() {
            return Err(DatasetError::Validation(format!(
                "reaction #{idx} must have a non-empty persona_uuid and ad_id"
            )));
        }

        for (field, value) in [
            ("trust_score", reaction.trust_score),
            ("relevance_score", reaction.relevance_score),
        ] {
            if value > MAX_SCORE {
                return Err(DatasetError::Validation(format!(
                    "reaction #{idx} ({} on {}) has {field} {value}; must be 0-{MAX_SCORE}",
                    reaction.persona_uuid, reaction.ad_id
                )));
            }
        }
    }

    Ok(())
}

pub(crate) fn validate_flow_results(
    results: &BTreeMap<FlowId, Vec<FlowJourney>>,
) -> Result<(), DatasetError> {
    for (flow_id, journeys) in results {
        for (idx, journey) in journeys.iter().enumerate() {
            if journey.persona_uuid.trim().is_empty() {
                return Err(DatasetError::Validation(format!(
                    "journey #{idx} of flow '{flow_id}' must have a non-empty persona_uuid"
                )));
            }

            if journey.completed_flow {
                if let Some(view) = journey.dropped_off_at_view {
                    return Err(DatasetError::Validation(format!(
                        "journey #{idx} of flow '{flow_id}' ({}) is complete but dropped off at view {view}",
                        journey.persona_uuid
                    )));
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
