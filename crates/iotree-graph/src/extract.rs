//! Thresholded edge extraction from the coefficient matrix.
//!
//! # Overview
//!
//! Turns the dense coefficient matrix into a sparse weighted directed
//! graph: entry `matrix[i][j]` at or above the threshold becomes the edge
//! `labels[i] → labels[j]` ("sector i feeds sector j"). Entries below the
//! threshold and all diagonal entries produce no edge; a diagonal entry
//! that would have cleared the threshold is reported as a
//! [`Diagnostic::SelfLoopSkipped`].
//!
//! Sectors that end up with no edge at all are absent from the node set —
//! the graph's nodes are exactly the participating sectors.
//!
//! ## Content hash
//!
//! The graph carries a BLAKE3 hash of the sorted weighted edge list.
//! Identical inputs and threshold always produce the identical hash, which
//! the determinism tests lean on.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeSet, HashMap};

use iotree_core::{CoefficientMatrix, LabelIndex};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument};

use crate::diag::Diagnostic;
use crate::error::GraphError;

// ---------------------------------------------------------------------------
// SectorGraph
// ---------------------------------------------------------------------------

/// The weighted directed dependency graph between sectors.
///
/// Nodes are sector labels; an edge `A → B` with weight `w` means "A feeds
/// B with input share `w`". Built by [`extract`]; mutated only by
/// [`crate::resolve::resolve`] (edge removal), otherwise read-only.
#[derive(Debug)]
pub struct SectorGraph {
    /// Directed graph: node weights = sector labels, edge weights = shares.
    pub graph: DiGraph<String, f32>,
    /// Mapping from sector label to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// BLAKE3 content hash of the sorted weighted edge list.
    pub content_hash: String,
}

impl SectorGraph {
    /// Number of sectors participating in at least one edge.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of extracted edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a sector label.
    #[must_use]
    pub fn node_index(&self, label: &str) -> Option<NodeIndex> {
        self.node_map.get(label).copied()
    }

    /// Sector label for a node.
    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// All participating sector labels.
    #[must_use]
    pub fn node_labels(&self) -> BTreeSet<String> {
        self.graph.node_weights().cloned().collect()
    }

    /// The edge list as `(source, dest, weight)` triples.
    ///
    /// Ordered by matrix position (row-major insertion order), so the
    /// sequence is deterministic for a fixed input.
    #[must_use]
    pub fn edges(&self) -> Vec<(String, String, f32)> {
        self.graph
            .edge_references()
            .filter_map(|edge| {
                let source = self.graph.node_weight(edge.source())?;
                let dest = self.graph.node_weight(edge.target())?;
                Some((source.clone(), dest.clone(), *edge.weight()))
            })
            .collect()
    }

    /// Out-neighbors of a node, sorted by label.
    #[must_use]
    pub fn successors_sorted(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        next.sort_by(|a, b| self.label(*a).cmp(&self.label(*b)));
        next
    }

    /// Recompute the content hash after edge mutation.
    pub fn refresh_content_hash(&mut self) {
        self.content_hash = compute_edge_hash(&self.sorted_edges());
    }

    fn sorted_edges(&self) -> Vec<(String, String, f32)> {
        let mut edges = self.edges();
        edges.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
        edges
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extract the weighted edge set from `matrix` at the given threshold.
///
/// Produces the [`SectorGraph`] plus the self-loop diagnostics. Pure given
/// its inputs; no deduplication is needed since each `(i, j)` pair occurs
/// at most once in the matrix.
///
/// # Errors
///
/// Returns [`GraphError::SizeMismatch`] if the label count and matrix
/// size disagree, [`GraphError::Validation`] if the threshold is not
/// finite.
#[instrument(skip(index, matrix))]
pub fn extract(
    index: &LabelIndex,
    matrix: &CoefficientMatrix,
    threshold: f32,
) -> Result<(SectorGraph, Vec<Diagnostic>), GraphError> {
    if index.len() != matrix.n() {
        return Err(GraphError::SizeMismatch {
            labels: index.len(),
            n: matrix.n(),
        });
    }
    if !threshold.is_finite() {
        return Err(GraphError::Validation(format!(
            "threshold must be finite, got {threshold}"
        )));
    }

    let mut graph = DiGraph::<String, f32>::new();
    let mut node_map: HashMap<String, NodeIndex> = HashMap::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut sorted_edges: Vec<(String, String, f32)> = Vec::new();

    for (i, source) in index.labels().iter().enumerate() {
        for (j, dest) in index.labels().iter().enumerate() {
            let weight = matrix.get(i, j);
            if weight < threshold {
                continue;
            }
            if i == j {
                debug!(label = %source, weight, "self-loop skipped");
                diagnostics.push(Diagnostic::SelfLoopSkipped {
                    label: source.clone(),
                    weight,
                });
                continue;
            }

            let source_idx = *node_map
                .entry(source.clone())
                .or_insert_with(|| graph.add_node(source.clone()));
            let dest_idx = *node_map
                .entry(dest.clone())
                .or_insert_with(|| graph.add_node(dest.clone()));
            graph.add_edge(source_idx, dest_idx, weight);
            sorted_edges.push((source.clone(), dest.clone(), weight));
        }
    }

    sorted_edges.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    let content_hash = compute_edge_hash(&sorted_edges);

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        threshold,
        "extracted sector graph"
    );

    Ok((
        SectorGraph {
            graph,
            node_map,
            content_hash,
        },
        diagnostics,
    ))
}

/// BLAKE3 hash of a sorted weighted edge list.
fn compute_edge_hash(edges: &[(String, String, f32)]) -> String {
    let mut hasher = blake3::Hasher::new();
    for (source, dest, weight) in edges {
        hasher.update(source.as_bytes());
        hasher.update(b"\x00");
        hasher.update(dest.as_bytes());
        hasher.update(b"\x00");
        hasher.update(&weight.to_bits().to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
