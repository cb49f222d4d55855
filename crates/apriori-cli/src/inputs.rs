//! Dataset arguments shared by the commands that read simulation output.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use apriori_core::{AdContext, AdId, Persona, Reaction};
use clap::Args;

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Persona dataset (JSON or YAML)
    #[arg(long)]
    pub personas: PathBuf,
    /// Simulated reactions (JSON or YAML)
    #[arg(long)]
    pub reactions: PathBuf,
    /// Optional per-ad copy and scam indicators, keyed by ad id
    #[arg(long)]
    pub ad_contexts: Option<PathBuf>,
}

pub struct Inputs {
    pub personas: Vec<Persona>,
    pub reactions: Vec<Reaction>,
    pub ad_contexts: BTreeMap<AdId, AdContext>,
}

/// Load every dataset named in `args`.
///
/// # Errors
///
/// Returns an error if any file cannot be read, parsed, or fails validation.
pub fn load_inputs(args: &InputArgs) -> anyhow::Result<Inputs> {
    let personas = apriori_core::load_personas(&args.personas)
        .with_context(|| format!("loading personas from {}", args.personas.display()))?;
    let reactions = apriori_core::load_reactions(&args.reactions)
        .with_context(|| format!("loading reactions from {}", args.reactions.display()))?;
    let ad_contexts = match &args.ad_contexts {
        Some(path) => apriori_core::load_ad_contexts(path)
            .with_context(|| format!("loading ad contexts from {}", path.display()))?,
        None => BTreeMap::new(),
    };

    tracing::info!(
        personas = personas.len(),
        reactions = reactions.len(),
        ad_contexts = ad_contexts.len(),
        "loaded inputs"
    );

    Ok(Inputs {
        personas,
        reactions,
        ad_contexts,
    })
}
