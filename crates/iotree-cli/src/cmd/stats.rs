//! `iotree stats` — summary statistics for the extracted graph.

use std::io::Write;
use std::path::Path;

use clap::Args;
use iotree_graph::GraphStats;

use crate::cmd::{extract_graph, load_config, load_table};
use crate::output::{OutputMode, render};

/// Arguments for `iotree stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Path to the Shift-JIS coefficient table CSV.
    pub table: std::path::PathBuf,
}

pub fn run_stats(
    args: &StatsArgs,
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
    let stats = GraphStats::from_graph(&sg);

    render(output, &stats, |s, w| {
        writeln!(w, "nodes:       {}", s.node_count)?;
        writeln!(w, "edges:       {}", s.edge_count)?;
        writeln!(w, "density:     {:.4}", s.density)?;
        writeln!(w, "cycles:      {}", s.cycle_count)?;
        writeln!(w, "components:  {}", s.weakly_connected_component_count)?;
        writeln!(w, "sources:     {}", s.source_count)?;
        writeln!(w, "sinks:       {}", s.sink_count)?;
        writeln!(w, "max in/out:  {}/{}", s.max_in_degree, s.max_out_degree)?;
        Ok(())
    })
}
