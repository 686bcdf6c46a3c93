//! `iotree edges` — list the thresholded dependency edges.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde_json::json;

use crate::cmd::{extract_graph, load_config, load_table};
use crate::output::{OutputMode, render};

/// Arguments for `iotree edges`.
#[derive(Args, Debug)]
pub struct EdgesArgs {
    /// Path to the Shift-JIS coefficient table CSV.
    pub table: std::path::PathBuf,
}

pub fn run_edges(
    args: &EdgesArgs,
    config_path: Option<&Path>,
    threshold: Option<f32>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path, output)?;
    if let Some(t) = threshold {
        config.threshold = t;
    }

    let table = load_table(&args.table, output)?;
    let (sg, diagnostics) = extract_graph(&table, config.threshold, output)?;

    let edges = sg.edges();
    let val = json!({
        "threshold": config.threshold,
        "node_count": sg.node_count(),
        "edges": edges,
        "diagnostics": diagnostics,
        "content_hash": sg.content_hash,
    });

    render(output, &val, |_, w| {
        writeln!(w, "{} nodes, {} edges", sg.node_count(), edges.len())?;
        for (source, dest, weight) in &edges {
            writeln!(w, "  {source} → {dest}  ({weight:.3})")?;
        }
        for diag in &diagnostics {
            writeln!(w, "  {diag}")?;
        }
        Ok(())
    })
}
