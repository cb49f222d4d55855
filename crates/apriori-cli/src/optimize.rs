//! `optimize` command: validate, optimize, and persist a simulation report.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context;
use apriori_core::{AdId, AppConfig};
use apriori_optimizer::{
    generate_heatmap_matrix, optimize_portfolio_with_policy, PortfolioPolicy, PortfolioResult,
    ReactionValidator,
};

use crate::inputs::{load_inputs, InputArgs};
use crate::report::{ReportMetadata, SimulationReport};

const REPORT_FILE_NAME: &str = "simulation_report.json";

pub(crate) fn policy_from_config(config: &AppConfig) -> PortfolioPolicy {
    PortfolioPolicy {
        min_budget_share_pct: config.min_budget_share_pct,
        clickbait_min_click_rate: config.clickbait_min_click_rate,
        clickbait_max_conversion_rate: config.clickbait_max_conversion_rate,
    }
}

pub(crate) fn validator_from_config(config: &AppConfig) -> ReactionValidator {
    ReactionValidator::new(
        config.trust_score_threshold,
        config.min_literacy_for_complex_form,
    )
}

/// Run the full pipeline and write the report JSON.
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded or the report cannot be written.
pub(crate) fn run_optimize(
    config: &AppConfig,
    args: &InputArgs,
    max_ads: usize,
    output: Option<PathBuf>,
    skip_validation: bool,
) -> anyhow::Result<()> {
    let inputs = load_inputs(args)?;

    let (reactions, validation_summary) = if skip_validation {
        tracing::info!("skipping reaction validation");
        (inputs.reactions.clone(), None)
    } else {
        let validator = validator_from_config(config);
        let summary = validator.validate_batch(&inputs.personas, &inputs.reactions, &inputs.ad_contexts);
        let kept = validator.filter_valid_reactions(&inputs.personas, &inputs.reactions, &inputs.ad_contexts);
        (kept, Some(summary))
    };

    let policy = policy_from_config(config);
    let result = optimize_portfolio_with_policy(&reactions, &inputs.personas, max_ads, &policy);

    let ad_ids: Vec<AdId> = inputs
        .reactions
        .iter()
        .map(|r| r.ad_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let visual_heatmap = generate_heatmap_matrix(&reactions, &inputs.personas, &ad_ids);

    let metadata = ReportMetadata {
        num_personas: inputs.personas.len(),
        num_ads: ad_ids.len(),
        total_reactions: inputs.reactions.len(),
        valid_reactions: reactions.len(),
    };

    print_portfolio(&result);
    if let Some(summary) = &validation_summary {
        println!(
            "validation: {} valid, {} flagged ({:.1}%)",
            summary.valid, summary.flagged, summary.flagged_percentage
        );
    }

    let report = SimulationReport::new(result, visual_heatmap, validation_summary, metadata);
    let path = output.unwrap_or_else(|| config.data_dir.join(REPORT_FILE_NAME));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(run_id = %report.run_id, path = %path.display(), "simulation report written");
    println!("report written to {}", path.display());
    Ok(())
}

fn print_portfolio(result: &PortfolioResult) {
    if result.winning_portfolio.is_empty() {
        println!("no ads selected");
        return;
    }

    let header = format!(
        "{:<12}{:<26}{:>8}  {}",
        "AD", "ROLE", "BUDGET", "TARGET SEGMENT"
    );
    println!("{header}");
    for rec in &result.winning_portfolio {
        println!(
            "{:<12}{:<26}{:>7.1}%  {}",
            rec.ad_id, rec.role, rec.budget_split, rec.target_segment
        );
    }

    for alert in &result.wasted_spend_alerts {
        println!("warning: {alert}");
    }
}

#[cfg(test)]
mod tests {
    use apriori_core::Environment;

    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            env: Environment::Test,
            log_level: "debug".to_string(),
            data_dir: PathBuf::from("./data"),
            default_max_ads: 4,
            min_budget_share_pct: 10.0,
            clickbait_min_click_rate: 20.0,
            clickbait_max_conversion_rate: 2.5,
            trust_score_threshold: 4,
            min_literacy_for_complex_form: 6,
        }
    }

    #[test]
    fn policy_follows_config_thresholds() {
        let policy = policy_from_config(&config());
        assert_eq!(policy.min_budget_share_pct, 10.0);
        assert_eq!(policy.clickbait_min_click_rate, 20.0);
        assert_eq!(policy.clickbait_max_conversion_rate, 2.5);
    }

    #[test]
    fn validator_follows_config_thresholds() {
        let validator = validator_from_config(&config());
        assert_eq!(validator.trust_score_threshold, 4);
        assert_eq!(validator.min_literacy_for_complex_form, 6);
    }
}
