//! `iotree tiers` — run the full pipeline and print the tiered layering.

use std::fmt::Write as FmtWrite;
use std::path::Path;

use clap::Args;
use iotree_graph::Pipeline;

use crate::cmd::{graph_error_to_cli, load_config, load_table};
use crate::output::{OutputMode, render, render_error};

/// Arguments for `iotree tiers`.
#[derive(Args, Debug)]
pub struct TiersArgs {
    /// Path to the Shift-JIS coefficient table CSV.
    pub table: std::path::PathBuf,
}

pub fn run_tiers(
    args: &TiersArgs,
    config_path: Option<&Path>,
    threshold: Option<f32>,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut config = load_config(config_path, output)?;
    if let Some(t) = threshold {
        config.threshold = t;
    }

    let table = load_table(&args.table, output)?;
    let pipeline = Pipeline::from_config(&config);

    let layering = pipeline.run(&table.labels, &table.matrix).map_err(|e| {
        render_error(output, &graph_error_to_cli(&e)).ok();
        anyhow::anyhow!("{e}")
    })?;

    render(output, &layering, |l, w| {
        let mut text = String::new();
        let _ = writeln!(text, "trunk: {}", l.trunk.join(" → "));
        for (depth, members) in &l.tiers {
            // Trunk members are starred so the backbone stands out per tier.
            let line: Vec<String> = members
                .iter()
                .map(|m| {
                    if l.trunk.contains(m) {
                        format!("{m}*")
                    } else {
                        m.clone()
                    }
                })
                .collect();
            let _ = writeln!(text, "  [{depth}] {}", line.join(", "));
        }
        if !l.diagnostics.is_empty() {
            let _ = writeln!(text, "\ndiagnostics:");
            for diag in &l.diagnostics {
                let _ = writeln!(text, "  {diag}");
            }
        }
        write!(w, "{text}")
    })
}
