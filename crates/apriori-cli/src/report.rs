//! Simulation report document and its markdown rendering.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use apriori_optimizer::{Heatmap, PortfolioResult, ValidationSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub num_personas: usize,
    pub num_ads: usize,
    pub total_reactions: usize,
    /// Reactions that reached the optimizer after validation.
    pub valid_reactions: usize,
}

/// Everything one `optimize` run produced, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: PortfolioResult,
    pub visual_heatmap: Heatmap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_summary: Option<ValidationSummary>,
    pub metadata: ReportMetadata,
}

impl SimulationReport {
    #[must_use]
    pub fn new(
        result: PortfolioResult,
        visual_heatmap: Heatmap,
        validation_summary: Option<ValidationSummary>,
        metadata: ReportMetadata,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            result,
            visual_heatmap,
            validation_summary,
            metadata,
        }
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Render a report as a markdown document.
///
/// # Errors
///
/// Returns [`std::fmt::Error`] if writing to the buffer fails.
pub fn render_markdown(report: &SimulationReport) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let generated = report.generated_at.format("%Y-%m-%d %H:%M UTC");
    let meta = &report.metadata;

    writeln!(out, "# Ad Portfolio Report")?;
    writeln!(out)?;
    writeln!(out, "**Run**: {}", report.run_id)?;
    writeln!(out, "**Generated**: {generated}")?;
    writeln!(
        out,
        "**Audience**: {} personas, {} ads, {} of {} reactions used",
        meta.num_personas, meta.num_ads, meta.valid_reactions, meta.total_reactions
    )?;
    writeln!(out)?;

    writeln!(out, "## Winning Portfolio")?;
    writeln!(out)?;
    if report.result.winning_portfolio.is_empty() {
        writeln!(out, "No ads selected.")?;
    } else {
        writeln!(out, "| Ad | Role | Budget | Target Segment | Reach | Conversions |")?;
        writeln!(out, "|----|------|--------|----------------|-------|-------------|")?;
        for rec in &report.result.winning_portfolio {
            writeln!(
                out,
                "| {} | {} | {:.1}% | {} | {} | {} |",
                escape_cell(&rec.ad_id),
                rec.role,
                rec.budget_split,
                escape_cell(&rec.target_segment),
                rec.unique_reach,
                rec.expected_conversions
            )?;
        }
    }
    writeln!(out)?;

    if !report.result.segment_ownership.is_empty() {
        writeln!(out, "## Segment Ownership")?;
        writeln!(out)?;
        writeln!(out, "| Cluster | Owner | Trust | Conversion | Why |")?;
        writeln!(out, "|---------|-------|-------|------------|-----|")?;
        for ownership in report.result.segment_ownership.values() {
            writeln!(
                out,
                "| {} | {} | {:.1} | {:.1}% | {} |",
                ownership.cluster_id,
                escape_cell(&ownership.winning_ad),
                ownership.trust_score,
                ownership.conversion_rate,
                ownership.reasoning
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Ad Performance")?;
    writeln!(out)?;
    writeln!(out, "| Ad | Impressions | Click Rate | Conversion Rate | Reach |")?;
    writeln!(out, "|----|-------------|------------|-----------------|-------|")?;
    for perf in report.result.all_performances.values() {
        writeln!(
            out,
            "| {} | {} | {:.2}% | {:.2}% | {} |",
            escape_cell(&perf.ad_id),
            perf.total_impressions,
            perf.click_rate,
            perf.conversion_rate,
            perf.unique_reach
        )?;
    }

    if !report.result.wasted_spend_alerts.is_empty() {
        writeln!(out)?;
        writeln!(out, "## Wasted Spend Alerts")?;
        writeln!(out)?;
        for alert in &report.result.wasted_spend_alerts {
            writeln!(out, "- {alert}")?;
        }
    }

    if let Some(summary) = &report.validation_summary {
        writeln!(out)?;
        writeln!(out, "## Validation")?;
        writeln!(out)?;
        writeln!(
            out,
            "{} of {} reactions flagged ({:.1}%).",
            summary.flagged, summary.total, summary.flagged_percentage
        )?;
    }

    Ok(out)
}

/// Print a saved simulation report as markdown.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a simulation report.
pub(crate) fn run_report(input: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("reading report {}", input.display()))?;
    let report: SimulationReport = serde_json::from_str(&raw)
        .with_context(|| format!("parsing report {}", input.display()))?;
    print!("{}", render_markdown(&report)?);
    Ok(())
}
