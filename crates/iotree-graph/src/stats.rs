//! Summary statistics for an extracted sector graph.
//!
//! # Statistics Provided
//!
//! - **node_count**: Sectors that survived thresholding.
//! - **edge_count**: Dependency edges at or above the threshold.
//! - **density**: Ratio of actual edges to maximum possible edges for a
//!   directed graph: `density = edge_count / (node_count * (node_count - 1))`.
//!   An empty or single-node graph has density 0.0.
//! - **cycle_count**: Number of simple dependency cycles (self-loops never
//!   survive extraction, so every cycle has at least two members).
//! - **weakly_connected_component_count**: Number of disjoint subgraphs
//!   with no edges between them.
//! - **source_count / sink_count**: Sectors with no in-edges / no
//!   out-edges.
//! - **max_in_degree / max_out_degree**: Highest in-degree and out-degree
//!   over all sectors.

use petgraph::{Direction, algo::connected_components, visit::IntoNodeIdentifiers};
use serde::Serialize;

use crate::cycles::find_all_cycles;
use crate::extract::SectorGraph;

// ---------------------------------------------------------------------------
// GraphStats
// ---------------------------------------------------------------------------

/// Summary statistics for a [`SectorGraph`], before or after cycle
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    /// Number of sectors (nodes) in the graph.
    pub node_count: usize,
    /// Number of dependency edges.
    pub edge_count: usize,
    /// Graph density: `edge_count / (node_count * (node_count - 1))`.
    /// Zero for graphs with 0 or 1 node.
    pub density: f64,
    /// Number of simple dependency cycles.
    pub cycle_count: usize,
    /// Number of weakly connected components (disjoint subgraphs).
    pub weakly_connected_component_count: usize,
    /// Number of sectors with no incoming edges.
    pub source_count: usize,
    /// Number of sectors with no outgoing edges.
    pub sink_count: usize,
    /// Maximum in-degree (most input dependencies on one sector).
    pub max_in_degree: usize,
    /// Maximum out-degree (sector feeding the most others).
    pub max_out_degree: usize,
}

impl GraphStats {
    /// Compute statistics from a [`SectorGraph`].
    #[must_use]
    pub fn from_graph(sg: &SectorGraph) -> Self {
        let node_count = sg.node_count();
        let edge_count = sg.edge_count();
        let density = compute_density(node_count, edge_count);
        let cycle_count = find_all_cycles(&sg.graph).len();
        let wcc = connected_components(&sg.graph);

        let source_count = sg.graph.externals(Direction::Incoming).count();
        let sink_count = sg.graph.externals(Direction::Outgoing).count();

        let max_in_degree = max_degree(sg, Direction::Incoming);
        let max_out_degree = max_degree(sg, Direction::Outgoing);

        Self {
            node_count,
            edge_count,
            density,
            cycle_count,
            weakly_connected_component_count: wcc,
            source_count,
            sink_count,
            max_in_degree,
            max_out_degree,
        }
    }

    /// Return `true` if the graph has no edges.
    #[must_use]
    pub const fn is_flat(&self) -> bool {
        self.edge_count == 0
    }

    /// Return `true` if the graph contains at least one dependency cycle.
    #[must_use]
    pub const fn has_cycles(&self) -> bool {
        self.cycle_count > 0
    }
}

fn max_degree(sg: &SectorGraph, direction: Direction) -> usize {
    sg.graph
        .node_identifiers()
        .map(|idx| sg.graph.neighbors_directed(idx, direction).count())
        .max()
        .unwrap_or(0)
}

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    edge_count as f64 / max_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
