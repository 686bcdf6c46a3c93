//! Cycle enumeration over the sector graph.
//!
//! # Overview
//!
//! The extracted graph may contain cycles — two sectors that each clear the
//! threshold as inputs to the other (the classic case: electricity and
//! fossil fuel extraction). This module finds them via Tarjan's SCC and,
//! for diagnostics, identifies the back-edges a DFS within each cycle would
//! remove to make it acyclic.
//!
//! Extraction never produces self-loops, but the helpers still report a
//! self-loop as a one-element cycle in case a caller builds a graph by
//! other means.

use std::collections::HashSet;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

/// Find all cycles currently present in `graph`.
///
/// Each entry is the sorted label list of one strongly connected component
/// with more than one member (or a self-loop singleton). The outer list is
/// sorted too, so output is deterministic.
#[must_use]
pub fn find_all_cycles(graph: &DiGraph<String, f32>) -> Vec<Vec<String>> {
    let mut cycles: Vec<Vec<String>> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || component.first().is_some_and(|node| has_self_loop(graph, *node))
        })
        .map(|component| {
            let mut labels: Vec<String> =
                component.into_iter().map(|idx| node_label(graph, idx)).collect();
            labels.sort_unstable();
            labels
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

/// A detected cycle with the back-edges that would break it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// Sorted labels of the cycle's members.
    pub members: Vec<String>,
    /// `(source, dest)` back-edges found by DFS within the cycle.
    ///
    /// Removing all of them makes the component acyclic; for a simple
    /// two-sector cycle there is exactly one.
    pub back_edges: Vec<(String, String)>,
}

/// Detect all cycles and report each with candidate break edges.
///
/// The DFS starts from the lexicographically smallest member and explores
/// neighbors in label order, so the reported back-edges are deterministic.
#[must_use]
pub fn report_cycles(graph: &DiGraph<String, f32>) -> Vec<CycleReport> {
    let mut reports: Vec<CycleReport> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || component.first().is_some_and(|node| has_self_loop(graph, *node))
        })
        .map(|component| {
            let mut members: Vec<String> =
                component.iter().map(|&idx| node_label(graph, idx)).collect();
            members.sort_unstable();

            if component.len() == 1 {
                let label = members[0].clone();
                return CycleReport {
                    members,
                    back_edges: vec![(label.clone(), label)],
                };
            }

            let member_set: HashSet<NodeIndex> = component.iter().copied().collect();
            let back_edges = back_edges_in_component(graph, &component, &member_set);

            CycleReport {
                members,
                back_edges,
            }
        })
        .collect();

    reports.sort_unstable_by(|a, b| a.members.cmp(&b.members));
    reports
}

fn has_self_loop(graph: &DiGraph<String, f32>, node: NodeIndex) -> bool {
    graph.find_edge(node, node).is_some()
}

fn node_label(graph: &DiGraph<String, f32>, idx: NodeIndex) -> String {
    graph
        .node_weight(idx)
        .cloned()
        .unwrap_or_else(|| format!("#{}", idx.index()))
}

/// Iterative DFS over one SCC collecting back-edges (edges to an ancestor
/// on the current DFS path).
///
/// The component is strongly connected, so a single DFS from the smallest
/// member reaches every node in it.
fn back_edges_in_component(
    graph: &DiGraph<String, f32>,
    component: &[NodeIndex],
    member_set: &HashSet<NodeIndex>,
) -> Vec<(String, String)> {
    let Some(start) = component
        .iter()
        .min_by_key(|&&idx| node_label(graph, idx))
        .copied()
    else {
        return Vec::new();
    };

    let member_neighbors = |node: NodeIndex| -> Vec<NodeIndex> {
        let mut next: Vec<NodeIndex> = graph
            .neighbors_directed(node, Direction::Outgoing)
            .filter(|n| member_set.contains(n))
            .collect();
        next.sort_by_key(|&idx| node_label(graph, idx));
        next
    };

    let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
    let mut on_path: HashSet<NodeIndex> = HashSet::from([start]);
    let mut back_edges: Vec<(String, String)> = Vec::new();

    // Each frame: (node, its member neighbors, next neighbor position).
    let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> =
        vec![(start, member_neighbors(start), 0)];

    while let Some((current, neighbors, pos)) = stack.last_mut() {
        if let Some(&next) = neighbors.get(*pos) {
            *pos += 1;
            if on_path.contains(&next) {
                back_edges.push((node_label(graph, *current), node_label(graph, next)));
            } else if visited.insert(next) {
                on_path.insert(next);
                stack.push((next, member_neighbors(next), 0));
            }
        } else {
            on_path.remove(current);
            stack.pop();
        }
    }

    back_edges.sort_unstable();
    back_edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
