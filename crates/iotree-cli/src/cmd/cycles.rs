//! `iotree cycles` — report dependency cycles in the extracted graph.
//!
//! Read-only: no edges are removed, whatever the configured policy. Useful
//! for authoring a `named_removals` list before running `tiers`.

use std::io::Write;
use std::path::Path;

use clap::Args;
use iotree_graph::report_cycles;
use serde_json::json;

use crate::cmd::{extract_graph, load_config, load_table};
use crate::output::{OutputMode, render};

/// Arguments for `iotree cycles`.
#[derive(Args, Debug)]
pub struct CyclesArgs {
    /// Path to the Shift-JIS coefficient table CSV.
    pub table: std::path::PathBuf,
}

pub fn run_cycles(
    args: &CyclesArgs,
    config_path: Option<&Path>,
    threshold: Option<f32>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path, output)?;
    if let Some(t) = threshold {
        config.threshold = t;
    }

    let table = load_table(&args.table, output)?;
    let (sg, _) = extract_graph(&table, config.threshold, output)?;

    let reports = report_cycles(&sg.graph);
    let val = json!({
        "cycle_count": reports.len(),
        "cycles": reports,
    });

    render(output, &val, |_, w| {
        if reports.is_empty() {
            writeln!(w, "no cycles")?;
            return Ok(());
        }
        writeln!(w, "{} cycle(s):", reports.len())?;
        for report in &reports {
            writeln!(w, "  {}", report.members.join(" ⇄ "))?;
            for (source, dest) in &report.back_edges {
                writeln!(w, "    back edge: {source} → {dest}")?;
            }
        }
        Ok(())
    })
}
