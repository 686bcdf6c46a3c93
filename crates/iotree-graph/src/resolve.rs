//! Policy-driven cycle elimination.
//!
//! # Overview
//!
//! The depth engine requires an acyclic graph, and a cyclic graph must
//! never be rendered as if it were a DAG. This module applies one declared
//! edge-removal policy, exactly one rewrite pass, then re-verifies
//! acyclicity. If any cycle survives the pass, the run aborts with
//! [`GraphError::CyclePersists`].
//!
//! No universally correct cycle-break exists for a coefficient-weighted
//! graph — the natural direction is ambiguous along the cycle — so the
//! policy is configuration, not algorithm:
//!
//! - [`ResolvePolicy::Strict`]: remove nothing; cycles are fatal.
//! - [`ResolvePolicy::RemoveLightestEdge`]: drop the minimum-weight edge
//!   inside each cycle (ties by `(source, dest)` label order).
//! - [`ResolvePolicy::RemoveNamedEdges`]: drop hand-authored edges known
//!   to be the offending back-edges for a specific dataset.

use std::collections::HashSet;

use iotree_core::config::{PipelineConfig, PolicyKind};
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use tracing::{info, warn};

use crate::cycles::find_all_cycles;
use crate::diag::Diagnostic;
use crate::error::GraphError;
use crate::extract::SectorGraph;

/// The declared edge-removal policy.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvePolicy {
    /// Remove nothing; any detected cycle aborts the pipeline.
    Strict,
    /// Remove the minimum-weight edge within each detected cycle.
    RemoveLightestEdge,
    /// Remove the listed `(source, dest)` edges, wherever present.
    RemoveNamedEdges(Vec<(String, String)>),
}

impl ResolvePolicy {
    /// Build the policy selected by a [`PipelineConfig`].
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        match config.policy {
            PolicyKind::Strict => Self::Strict,
            PolicyKind::Lightest => Self::RemoveLightestEdge,
            PolicyKind::Named => Self::RemoveNamedEdges(config.named_removals.clone()),
        }
    }
}

/// Eliminate cycles from `sg` under `policy`.
///
/// Acyclic input is returned unchanged with no diagnostics. Otherwise each
/// detected cycle is reported as a [`Diagnostic::CycleDetected`], the
/// policy's removals are applied in one pass (each reported as
/// [`Diagnostic::EdgeRemoved`]), and acyclicity is re-verified.
///
/// # Errors
///
/// Returns [`GraphError::CyclePersists`] if the policy is
/// [`ResolvePolicy::Strict`] or any cycle survives the rewrite pass.
pub fn resolve(
    sg: &mut SectorGraph,
    policy: &ResolvePolicy,
) -> Result<Vec<Diagnostic>, GraphError> {
    let cycles = find_all_cycles(&sg.graph);
    if cycles.is_empty() {
        return Ok(Vec::new());
    }

    let mut diagnostics: Vec<Diagnostic> = Vec::with_capacity(cycles.len());
    for members in &cycles {
        warn!(cycle = %members.join(" → "), "dependency cycle detected");
        diagnostics.push(Diagnostic::CycleDetected {
            members: members.clone(),
        });
    }

    let removals = match policy {
        ResolvePolicy::Strict => return Err(GraphError::CyclePersists { cycles }),
        ResolvePolicy::RemoveLightestEdge => lightest_edges(sg, &cycles),
        ResolvePolicy::RemoveNamedEdges(named) => named.clone(),
    };

    for (source, dest) in removals {
        if let Some(weight) = remove_edge(sg, &source, &dest) {
            info!(%source, %dest, weight, "removed edge to break cycle");
            diagnostics.push(Diagnostic::EdgeRemoved {
                source,
                dest,
                weight,
            });
        } else {
            warn!(%source, %dest, "named removal edge not present in graph");
        }
    }

    let remaining = find_all_cycles(&sg.graph);
    if !remaining.is_empty() {
        return Err(GraphError::CyclePersists { cycles: remaining });
    }

    sg.refresh_content_hash();
    Ok(diagnostics)
}

/// For each cycle, the minimum-weight edge among edges internal to it.
///
/// Ties are broken by `(source, dest)` label order so the selection is
/// deterministic.
fn lightest_edges(sg: &SectorGraph, cycles: &[Vec<String>]) -> Vec<(String, String)> {
    let mut removals = Vec::with_capacity(cycles.len());

    for members in cycles {
        let member_idx: HashSet<NodeIndex> = members
            .iter()
            .filter_map(|label| sg.node_index(label))
            .collect();

        let lightest = sg
            .graph
            .edge_references()
            .filter(|e| member_idx.contains(&e.source()) && member_idx.contains(&e.target()))
            .filter_map(|e| {
                let source = sg.label(e.source())?;
                let dest = sg.label(e.target())?;
                Some((*e.weight(), source.to_string(), dest.to_string()))
            })
            .min_by(|a, b| {
                a.0.total_cmp(&b.0)
                    .then_with(|| a.1.cmp(&b.1))
                    .then_with(|| a.2.cmp(&b.2))
            });

        if let Some((_, source, dest)) = lightest {
            removals.push((source, dest));
        }
    }

    removals
}

/// Remove the edge `source → dest` if present, returning its weight.
fn remove_edge(sg: &mut SectorGraph, source: &str, dest: &str) -> Option<f32> {
    let from = sg.node_index(source)?;
    let to = sg.node_index(dest)?;
    let edge = sg.graph.find_edge(from, to)?;
    sg.graph.remove_edge(edge)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use iotree_core::{CoefficientMatrix, LabelIndex};

    use crate::extract::extract;

    fn graph_for(rows: Vec<Vec<f32>>, names: &[&str]) -> (SectorGraph, Vec<Diagnostic>) {
        let labels: Vec<String> = names.iter().map(|s| (*s).to_string()).collect();
        let index = LabelIndex::new(&labels).expect("index");
        let matrix = CoefficientMatrix::from_rows(rows).expect("matrix");
        extract(&index, &matrix, 0.05).expect("extract")
    }

    // A ⇄ B with A→B heavier; plus B→C so the DAG survives resolution.
    fn cyclic_graph() -> SectorGraph {
        let (sg, _) = graph_for(
            vec![
                vec![0.0, 0.10, 0.0],
                vec![0.08, 0.0, 0.2],
                vec![0.0, 0.0, 0.0],
            ],
            &["A", "B", "C"],
        );
        sg
    }

    #[test]
    fn acyclic_graph_unchanged() {
        let (mut sg, _) = graph_for(
            vec![vec![0.0, 0.1], vec![0.0, 0.0]],
            &["A", "B"],
        );
        let hash_before = sg.content_hash.clone();

        let diags = resolve(&mut sg, &ResolvePolicy::Strict).expect("acyclic passes strict");
        assert!(diags.is_empty());
        assert_eq!(sg.edge_count(), 1);
        assert_eq!(sg.content_hash, hash_before);
    }

    #[test]
    fn strict_policy_fails_on_cycle() {
        let mut sg = cyclic_graph();
        let err = resolve(&mut sg, &ResolvePolicy::Strict).expect_err("cycle is fatal");

        assert!(matches!(
            err,
            GraphError::CyclePersists { cycles }
                if cycles == vec![vec!["A".to_string(), "B".to_string()]]
        ));
    }

    #[test]
    fn lightest_edge_removed() {
        let mut sg = cyclic_graph();
        let diags = resolve(&mut sg, &ResolvePolicy::RemoveLightestEdge).expect("resolved");

        // B→A (0.08) is lighter than A→B (0.10).
        assert!(diags.contains(&Diagnostic::EdgeRemoved {
            source: "B".to_string(),
            dest: "A".to_string(),
            weight: 0.08,
        }));
        assert!(diags.iter().any(|d| matches!(d, Diagnostic::CycleDetected { .. })));
        assert!(find_all_cycles(&sg.graph).is_empty());
        assert_eq!(sg.edge_count(), 2);
    }

    #[test]
    fn named_edge_removed() {
        let mut sg = cyclic_graph();
        let policy =
            ResolvePolicy::RemoveNamedEdges(vec![("A".to_string(), "B".to_string())]);
        let diags = resolve(&mut sg, &policy).expect("resolved");

        assert!(diags.contains(&Diagnostic::EdgeRemoved {
            source: "A".to_string(),
            dest: "B".to_string(),
            weight: 0.10,
        }));
        assert!(find_all_cycles(&sg.graph).is_empty());
    }

    #[test]
    fn named_edge_missing_cycle_persists() {
        let mut sg = cyclic_graph();
        let policy =
            ResolvePolicy::RemoveNamedEdges(vec![("C".to_string(), "A".to_string())]);
        let err = resolve(&mut sg, &policy).expect_err("wrong edge leaves cycle");

        assert!(matches!(err, GraphError::CyclePersists { .. }));
    }

    #[test]
    fn hash_refreshed_after_removal() {
        let mut sg = cyclic_graph();
        let hash_before = sg.content_hash.clone();
        resolve(&mut sg, &ResolvePolicy::RemoveLightestEdge).expect("resolved");

        assert_ne!(sg.content_hash, hash_before, "hash reflects removed edge");
    }

    #[test]
    fn policy_from_config() {
        use iotree_core::config::PolicyKind;

        let mut config = PipelineConfig::default();
        assert_eq!(ResolvePolicy::from_config(&config), ResolvePolicy::Strict);

        config.policy = PolicyKind::Lightest;
        assert_eq!(
            ResolvePolicy::from_config(&config),
            ResolvePolicy::RemoveLightestEdge
        );

        config.policy = PolicyKind::Named;
        config.named_removals = vec![("A".to_string(), "B".to_string())];
        assert_eq!(
            ResolvePolicy::from_config(&config),
            ResolvePolicy::RemoveNamedEdges(vec![("A".to_string(), "B".to_string())])
        );
    }
}
