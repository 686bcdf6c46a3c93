//! End-to-end pipeline from coefficient matrix to tiered layering.

use std::collections::{BTreeMap, BTreeSet};

use iotree_core::config::PipelineConfig;
use iotree_core::{CoefficientMatrix, LabelIndex};
use serde::Serialize;
use tracing::{info, instrument};

use crate::diag::Diagnostic;
use crate::error::GraphError;
use crate::extract::extract;
use crate::layering::{assign_depths, select_trunk};
use crate::resolve::{ResolvePolicy, resolve};

// ---------------------------------------------------------------------------
// Layering
// ---------------------------------------------------------------------------

/// The complete output of one pipeline run: an internally consistent
/// tiered DAG plus the diagnostics accumulated along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layering {
    /// Sectors that participate in at least one edge.
    pub nodes: BTreeSet<String>,
    /// Surviving dependency edges after cycle resolution. Matrix row-major
    /// order when no edge was removed; deterministic in any case.
    pub edges: Vec<(String, String, f32)>,
    /// The longest source-to-sink chain, in order.
    pub trunk: Vec<String>,
    /// Depth assigned to every node.
    pub depth_map: BTreeMap<String, usize>,
    /// Inversion of `depth_map`: one sorted tier of labels per depth.
    pub tiers: BTreeMap<usize, Vec<String>>,
    /// Skipped self-loops, detected cycles, and removed edges.
    pub diagnostics: Vec<Diagnostic>,
    /// BLAKE3 hash of the final edge set, `blake3:`-prefixed.
    pub content_hash: String,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Pipeline configuration: extraction threshold plus cycle policy.
#[derive(Debug, Clone)]
pub struct Pipeline {
    threshold: f32,
    policy: ResolvePolicy,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl Pipeline {
    /// Build a pipeline with an explicit threshold and policy.
    #[must_use]
    pub const fn new(threshold: f32, policy: ResolvePolicy) -> Self {
        Self { threshold, policy }
    }

    /// Build a pipeline from a loaded [`PipelineConfig`].
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            threshold: config.threshold,
            policy: ResolvePolicy::from_config(config),
        }
    }

    /// Run the full pipeline over one `(labels, matrix)` input.
    ///
    /// Either returns a complete [`Layering`] or aborts with the first
    /// error; there is no partial-result mode.
    ///
    /// # Errors
    ///
    /// - [`GraphError::Validation`] for duplicate labels or a non-finite
    ///   threshold.
    /// - [`GraphError::SizeMismatch`] when the label count does not match
    ///   the matrix dimension.
    /// - [`GraphError::CyclePersists`] when the policy leaves a cycle.
    /// - [`GraphError::NoTrunk`] when no source reaches any sink.
    /// - [`GraphError::DegenerateGraph`] for a node that is both source
    ///   and sink.
    #[instrument(skip(self, labels, matrix), fields(sectors = labels.len(), threshold = self.threshold))]
    pub fn run(
        &self,
        labels: &[String],
        matrix: &CoefficientMatrix,
    ) -> Result<Layering, GraphError> {
        let index = LabelIndex::new(labels)
            .map_err(|e| GraphError::Validation(e.to_string()))?;

        let (mut sg, mut diagnostics) = extract(&index, matrix, self.threshold)?;
        diagnostics.extend(resolve(&mut sg, &self.policy)?);

        let trunk = select_trunk(&sg)?;
        let (depth_map, tiers) = assign_depths(&sg, &trunk);

        info!(
            nodes = sg.node_count(),
            edges = sg.edge_count(),
            trunk_len = trunk.len(),
            tiers = tiers.len(),
            "pipeline complete"
        );

        Ok(Layering {
            nodes: sg.node_labels(),
            edges: sg.edges(),
            trunk,
            depth_map,
            tiers,
            diagnostics,
            content_hash: sg.content_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pipeline_is_strict() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.policy, ResolvePolicy::Strict);
        assert!((pipeline.threshold - 0.05).abs() < f32::EPSILON);
    }

    #[test]
    fn duplicate_labels_rejected() {
        let labels = vec!["A".to_string(), "A".to_string()];
        let matrix = CoefficientMatrix::new(2, vec![0.0; 4]).expect("matrix");
        let err = Pipeline::default().run(&labels, &matrix).expect_err("dup");
        assert!(matches!(err, GraphError::Validation(_)));
    }

    #[test]
    fn label_matrix_size_mismatch_rejected() {
        let labels = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let matrix = CoefficientMatrix::new(2, vec![0.0; 4]).expect("matrix");
        let err = Pipeline::default()
            .run(&labels, &matrix)
            .expect_err("mismatch");
        assert!(matches!(err, GraphError::SizeMismatch { labels: 3, n: 2 }));
    }
}
