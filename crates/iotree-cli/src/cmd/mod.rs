//! Command handlers.
//!
//! Each handler loads the coefficient table, runs the relevant pipeline
//! stage, and renders the result through [`crate::output`].

pub mod cycles;
pub mod edges;
pub mod stats;
pub mod tiers;

use std::path::Path;

use iotree_core::error::ErrorCode;
use iotree_core::table::TableError;
use iotree_core::{InputTable, PipelineConfig};
use iotree_graph::GraphError;

use crate::output::{CliError, OutputMode, render_error};

/// Load and parse the Shift-JIS coefficient table, rendering a structured
/// error on failure.
pub fn load_table(path: &Path, output: OutputMode) -> anyhow::Result<InputTable> {
    InputTable::from_path(path).map_err(|e| {
        let code = match e {
            TableError::NotSquare { .. } => ErrorCode::NonSquareMatrix,
            _ => ErrorCode::TableParseError,
        };
        let cli_error = CliError::with_code(e.to_string(), code);
        render_error(output, &cli_error).ok();
        anyhow::anyhow!("{e}")
    })
}

/// Load the pipeline config from `path`, or fall back to defaults.
pub fn load_config(path: Option<&Path>, output: OutputMode) -> anyhow::Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    PipelineConfig::load(path).map_err(|e| {
        let cli_error = CliError::with_code(format!("{e:#}"), ErrorCode::ConfigParseError);
        render_error(output, &cli_error).ok();
        e
    })
}

/// Extract the thresholded sector graph from a parsed table.
///
/// Used by the read-only commands that inspect the graph before cycle
/// resolution.
pub fn extract_graph(
    table: &InputTable,
    threshold: f32,
    output: OutputMode,
) -> anyhow::Result<(iotree_graph::SectorGraph, Vec<iotree_graph::Diagnostic>)> {
    let index = iotree_core::LabelIndex::new(&table.labels).map_err(|e| {
        let cli_error = CliError::with_code(e.to_string(), ErrorCode::DuplicateLabel);
        render_error(output, &cli_error).ok();
        anyhow::anyhow!("{e}")
    })?;
    iotree_graph::extract(&index, &table.matrix, threshold).map_err(|e| {
        render_error(output, &graph_error_to_cli(&e)).ok();
        anyhow::anyhow!("{e}")
    })
}

/// Map a pipeline failure to its stable CLI error code.
#[must_use]
pub fn graph_error_to_cli(err: &GraphError) -> CliError {
    let code = match err {
        GraphError::Validation(_) => ErrorCode::DuplicateLabel,
        GraphError::SizeMismatch { .. } => ErrorCode::NonSquareMatrix,
        GraphError::CyclePersists { .. } => ErrorCode::CyclePersists,
        GraphError::NoTrunk => ErrorCode::NoTrunk,
        GraphError::DegenerateGraph { .. } => ErrorCode::DegenerateGraph,
    };
    CliError::with_code(err.to_string(), code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_error_maps_to_cycle_code() {
        let err = GraphError::CyclePersists {
            cycles: vec![vec!["A".to_string(), "B".to_string()]],
        };
        let cli = graph_error_to_cli(&err);
        assert_eq!(cli.error_code.as_deref(), Some("E3001"));
    }

    #[test]
    fn size_mismatch_maps_to_square_code() {
        let cli = graph_error_to_cli(&GraphError::SizeMismatch { labels: 3, n: 2 });
        assert_eq!(cli.error_code.as_deref(), Some("E2002"));
    }

    #[test]
    fn no_trunk_maps_to_trunk_code() {
        let cli = graph_error_to_cli(&GraphError::NoTrunk);
        assert_eq!(cli.error_code.as_deref(), Some("E3002"));
    }

    #[test]
    fn missing_config_path_yields_defaults() {
        let config = load_config(None, OutputMode::Human).expect("defaults");
        assert!((config.threshold - 0.05).abs() < f32::EPSILON);
    }
}
