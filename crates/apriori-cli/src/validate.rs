//! `validate` command: report reactions that fail consistency checks.

use apriori_core::AppConfig;

use crate::inputs::{load_inputs, InputArgs};
use crate::optimize::validator_from_config;

/// Print the validation summary and every flagged reaction.
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded.
pub(crate) fn run_validate(config: &AppConfig, args: &InputArgs) -> anyhow::Result<()> {
    let inputs = load_inputs(args)?;
    let validator = validator_from_config(config);
    let summary = validator.validate_batch(&inputs.personas, &inputs.reactions, &inputs.ad_contexts);

    println!("Total reactions: {}", summary.total);
    println!("Valid:           {}", summary.valid);
    println!(
        "Flagged:         {} ({:.1}%)",
        summary.flagged, summary.flagged_percentage
    );

    if summary.flagged_reactions.is_empty() {
        return Ok(());
    }

    println!();
    for flagged in &summary.flagged_reactions {
        println!("{} on {}", flagged.persona_uuid, flagged.ad_id);
        for flag in &flagged.flags {
            println!("  - {flag}");
        }
    }

    Ok(())
}
