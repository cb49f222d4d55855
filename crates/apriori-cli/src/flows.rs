//! `flows` command: compare simulated multi-screen flows by completion.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use apriori_core::AppConfig;
use apriori_optimizer::{compare_flows, FlowComparisonResult};

const REPORT_FILE_NAME: &str = "flow_comparison_report.json";

/// Render the winner, the ranking table, and each flow's recommendations.
fn render_summary(comparison: &FlowComparisonResult) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    let Some(winner) = &comparison.winning_flow_name else {
        writeln!(out, "no flows to compare")?;
        return Ok(out);
    };

    writeln!(
        out,
        "winner: {winner} ({:.1}% completion)",
        comparison.winning_completion_rate
    )?;
    writeln!(out, "{}", comparison.why_winner_wins)?;
    writeln!(out)?;

    writeln!(
        out,
        "{:<12}{:<28}{:>11}{:>10}  {}",
        "FLOW", "NAME", "COMPLETION", "DROPPED", "DOMINANT DROP-OFF"
    )?;
    for ranking in &comparison.flow_rankings {
        let drop_off = match (
            ranking.dominant_drop_off_view,
            ranking.dominant_drop_off_reason.as_deref(),
        ) {
            (Some(view), Some(reason)) => format!("View {view}: {reason}"),
            _ => "-".to_string(),
        };
        writeln!(
            out,
            "{:<12}{:<28}{:>10.1}%{:>10}  {drop_off}",
            ranking.flow_id, ranking.flow_name, ranking.completion_rate, ranking.dropped
        )?;
    }

    for (flow_id, recs) in &comparison.improvement_recommendations {
        if recs.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "{flow_id}:")?;
        for rec in recs {
            writeln!(out, "  - {rec}")?;
        }
    }

    Ok(out)
}

/// Compare flows, print the summary, and write the comparison JSON.
///
/// # Errors
///
/// Returns an error if the results or names cannot be loaded, or the report
/// cannot be written.
pub(crate) fn run_flows(
    config: &AppConfig,
    results: &Path,
    names: Option<&Path>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let flow_results = apriori_core::load_flow_results(results)
        .with_context(|| format!("loading flow results from {}", results.display()))?;
    let flow_names = match names {
        Some(path) => apriori_core::load_flow_names(path)
            .with_context(|| format!("loading flow names from {}", path.display()))?,
        None => BTreeMap::new(),
    };

    let comparison = compare_flows(&flow_results, &flow_names);
    print!("{}", render_summary(&comparison)?);

    let path = output.unwrap_or_else(|| config.data_dir.join(REPORT_FILE_NAME));
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&comparison)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(flows = flow_results.len(), path = %path.display(), "flow comparison written");
    println!("report written to {}", path.display());
    Ok(())
}
