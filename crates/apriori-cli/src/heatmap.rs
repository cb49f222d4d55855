//! `heatmap` command: terminal rendering of the segment conversion grid.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use apriori_core::AdId;
use apriori_optimizer::{generate_heatmap_matrix, Heatmap};

use crate::inputs::{load_inputs, InputArgs};

/// Render a heatmap as a fixed-width grid followed by a glyph legend.
fn render_grid(heatmap: &Heatmap) -> Result<String, std::fmt::Error> {
    let row_width = heatmap.rows.iter().map(String::len).max().unwrap_or(0).max(8);
    let mut out = String::new();

    write!(out, "{:<row_width$}", "SEGMENT")?;
    for col in &heatmap.cols {
        write!(out, "  {col}")?;
    }
    writeln!(out)?;

    for (row, cells) in heatmap.rows.iter().zip(&heatmap.matrix) {
        write!(out, "{row:<row_width$}")?;
        for (col, cell) in heatmap.cols.iter().zip(cells) {
            write!(out, "  {:^width$}", cell.glyph(), width = col.len())?;
        }
        writeln!(out)?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "# strong (>=30%)  + medium (>=15%)  - weak (>=5%)  x poor  . no data"
    )?;
    Ok(out)
}

/// Print the heatmap for the given datasets.
///
/// # Errors
///
/// Returns an error if inputs cannot be loaded.
pub(crate) fn run_heatmap(args: &InputArgs) -> anyhow::Result<()> {
    let inputs = load_inputs(args)?;
    let ad_ids: Vec<AdId> = inputs
        .reactions
        .iter()
        .map(|r| r.ad_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let heatmap = generate_heatmap_matrix(&inputs.reactions, &inputs.personas, &ad_ids);
    print!("{}", render_grid(&heatmap)?);
    Ok(())
}
