//! Trunk selection and depth assignment over the resolved DAG.
//!
//! The trunk is the longest source-to-sink dependency chain, measured in
//! hops over per-pair shortest paths. Depths increase by one along the
//! trunk; every other node rides with the most recently passed trunk node
//! in topological order. This is a deliberately simple heuristic that
//! compresses side-branches onto the trunk's pacing rather than spreading
//! them by their own longest path.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::error::GraphError;
use crate::extract::SectorGraph;

// ---------------------------------------------------------------------------
// Source / sink queries
// ---------------------------------------------------------------------------

/// Labels of nodes with no incoming edges, sorted.
#[must_use]
pub fn sources(sg: &SectorGraph) -> Vec<String> {
    boundary_nodes(sg, Direction::Incoming)
}

/// Labels of nodes with no outgoing edges, sorted.
#[must_use]
pub fn sinks(sg: &SectorGraph) -> Vec<String> {
    boundary_nodes(sg, Direction::Outgoing)
}

fn boundary_nodes(sg: &SectorGraph, empty_side: Direction) -> Vec<String> {
    let mut labels: Vec<String> = sg
        .graph
        .externals(empty_side)
        .filter_map(|idx| sg.label(idx).map(ToString::to_string))
        .collect();
    labels.sort_unstable();
    labels
}

/// Verify that no node is simultaneously a source and a sink.
///
/// A node with no edges at all should never survive extraction, and a
/// resolver pass never strips a node of every edge silently; hitting this
/// means the graph upstream is malformed.
///
/// # Errors
///
/// Returns [`GraphError::DegenerateGraph`] naming the first offending
/// node in label order.
pub fn check_not_degenerate(sg: &SectorGraph) -> Result<(), GraphError> {
    let sink_set: HashSet<String> = sinks(sg).into_iter().collect();
    if let Some(node) = sources(sg).into_iter().find(|s| sink_set.contains(s)) {
        return Err(GraphError::DegenerateGraph { node });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Path and order queries
// ---------------------------------------------------------------------------

/// Shortest hop path from `from` to `to`, or `None` if unreachable.
///
/// Breadth-first with neighbors expanded in label order, so the returned
/// path is stable across runs.
#[must_use]
pub fn shortest_path(sg: &SectorGraph, from: NodeIndex, to: NodeIndex) -> Option<Vec<NodeIndex>> {
    if from == to {
        return Some(vec![from]);
    }

    let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([from]);

    while let Some(current) = queue.pop_front() {
        for next in sg.successors_sorted(current) {
            if next == from || parent.contains_key(&next) {
                continue;
            }
            parent.insert(next, current);
            if next == to {
                let mut path = vec![to];
                let mut step = to;
                while let Some(&prev) = parent.get(&step) {
                    path.push(prev);
                    step = prev;
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(next);
        }
    }

    None
}

/// A deterministic topological order over all nodes.
///
/// Reverse postorder of a depth-first traversal rooted at the sources in
/// label order, with successors also expanded in label order. On a DAG
/// every node is reachable from some source, so the order is total.
#[must_use]
pub fn topological_order(sg: &SectorGraph) -> Vec<NodeIndex> {
    let mut roots: Vec<NodeIndex> = sg.graph.externals(Direction::Incoming).collect();
    roots.sort_unstable_by(|a, b| sg.label(*a).cmp(&sg.label(*b)));

    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut postorder: Vec<NodeIndex> = Vec::with_capacity(sg.node_count());

    for root in roots {
        if visited.contains(&root) {
            continue;
        }
        visited.insert(root);

        let mut stack: Vec<(NodeIndex, Vec<NodeIndex>, usize)> =
            vec![(root, sg.successors_sorted(root), 0)];
        while let Some((node, neighbors, pos)) = stack.last_mut() {
            if let Some(&next) = neighbors.get(*pos) {
                *pos += 1;
                if visited.insert(next) {
                    stack.push((next, sg.successors_sorted(next), 0));
                }
            } else {
                postorder.push(*node);
                stack.pop();
            }
        }
    }

    postorder.reverse();
    postorder
}

// ---------------------------------------------------------------------------
// Trunk selection
// ---------------------------------------------------------------------------

/// Select the trunk: the longest shortest hop path over all
/// source-to-sink pairs.
///
/// Pairs are scanned in `(source, sink)` label order and a candidate only
/// replaces the incumbent when strictly longer, so ties resolve to the
/// lexicographically smallest pair.
///
/// # Errors
///
/// Returns [`GraphError::NoTrunk`] when no source reaches any sink.
pub fn select_trunk(sg: &SectorGraph) -> Result<Vec<String>, GraphError> {
    check_not_degenerate(sg)?;

    let sink_labels = sinks(sg);
    let mut best: Option<Vec<NodeIndex>> = None;
    for source in sources(sg) {
        let Some(from) = sg.node_index(&source) else {
            continue;
        };
        for sink in &sink_labels {
            let Some(to) = sg.node_index(sink) else {
                continue;
            };
            if let Some(path) = shortest_path(sg, from, to) {
                if best.as_ref().is_none_or(|b| path.len() > b.len()) {
                    best = Some(path);
                }
            }
        }
    }

    let trunk: Vec<String> = best
        .ok_or(GraphError::NoTrunk)?
        .into_iter()
        .filter_map(|idx| sg.label(idx).map(ToString::to_string))
        .collect();
    debug!(trunk = %trunk.join(" → "), "selected trunk");
    Ok(trunk)
}

// ---------------------------------------------------------------------------
// Depth assignment
// ---------------------------------------------------------------------------

/// Assign a depth to every node via a single topological sweep.
///
/// Trunk node `k` gets depth `k`. Every other node gets the depth of the
/// most recently visited trunk node preceding it in topological order.
/// Returns the depth map and its inversion into sorted per-depth tiers.
#[must_use]
pub fn assign_depths(
    sg: &SectorGraph,
    trunk: &[String],
) -> (BTreeMap<String, usize>, BTreeMap<usize, Vec<String>>) {
    let trunk_depth: HashMap<&str, usize> = trunk
        .iter()
        .enumerate()
        .map(|(k, label)| (label.as_str(), k))
        .collect();

    let mut depth_map: BTreeMap<String, usize> = BTreeMap::new();
    let mut current_depth = 0;
    for idx in topological_order(sg) {
        let Some(label) = sg.label(idx) else {
            continue;
        };
        if let Some(&depth) = trunk_depth.get(label) {
            current_depth = depth;
        }
        depth_map.insert(label.to_string(), current_depth);
    }

    let mut tiers: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (label, &depth) in &depth_map {
        tiers.entry(depth).or_default().push(label.clone());
    }

    (depth_map, tiers)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use iotree_core::{CoefficientMatrix, LabelIndex};

    use crate::extract::extract;

    fn graph_for(rows: Vec<Vec<f32>>, names: &[&str]) -> SectorGraph {
        let labels: Vec<String> = names.iter().map(|s| (*s).to_string()).collect();
        let index = LabelIndex::new(&labels).expect("index");
        let matrix = CoefficientMatrix::from_rows(rows).expect("matrix");
        extract(&index, &matrix, 0.05).expect("extract").0
    }

    // A→B→C→D chain.
    fn chain() -> SectorGraph {
        graph_for(
            vec![
                vec![0.0, 0.10, 0.0, 0.0],
                vec![0.0, 0.0, 0.20, 0.0],
                vec![0.0, 0.0, 0.0, 0.30],
                vec![0.0, 0.0, 0.0, 0.0],
            ],
            &["A", "B", "C", "D"],
        )
    }

    // Trunk A→B→D plus side branch A→C where C is also a sink.
    fn branched() -> SectorGraph {
        graph_for(
            vec![
                vec![0.0, 0.10, 0.10, 0.0],
                vec![0.0, 0.0, 0.0, 0.20],
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
            ],
            &["A", "B", "C", "D"],
        )
    }

    #[test]
    fn sources_and_sinks_of_chain() {
        let sg = chain();
        assert_eq!(sources(&sg), vec!["A"]);
        assert_eq!(sinks(&sg), vec!["D"]);
        assert!(check_not_degenerate(&sg).is_ok());
    }

    #[test]
    fn node_stripped_of_every_edge_is_degenerate() {
        use crate::resolve::{ResolvePolicy, resolve};

        // A ⇄ B is the whole graph; removing both directions by name
        // leaves two isolated nodes, each a source and a sink at once.
        let mut sg = graph_for(vec![vec![0.0, 0.10], vec![0.08, 0.0]], &["A", "B"]);
        let policy = ResolvePolicy::RemoveNamedEdges(vec![
            ("A".to_string(), "B".to_string()),
            ("B".to_string(), "A".to_string()),
        ]);
        resolve(&mut sg, &policy).expect("cycle fully removed");

        let err = select_trunk(&sg).expect_err("isolated nodes cannot anchor a trunk");
        assert!(matches!(err, GraphError::DegenerateGraph { node } if node == "A"));
    }

    #[test]
    fn shortest_path_follows_chain() {
        let sg = chain();
        let from = sg.node_index("A").expect("A");
        let to = sg.node_index("D").expect("D");
        let path = shortest_path(&sg, from, to).expect("path");
        let labels: Vec<&str> = path.iter().filter_map(|&i| sg.label(i)).collect();
        assert_eq!(labels, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn shortest_path_none_when_unreachable() {
        let sg = chain();
        let from = sg.node_index("D").expect("D");
        let to = sg.node_index("A").expect("A");
        assert!(shortest_path(&sg, from, to).is_none());
    }

    #[test]
    fn topological_order_respects_edges() {
        let sg = branched();
        let order = topological_order(&sg);
        assert_eq!(order.len(), sg.node_count());

        let rank: HashMap<NodeIndex, usize> =
            order.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        for (source, dest, _) in sg.edges() {
            let s = sg.node_index(&source).expect("source");
            let d = sg.node_index(&dest).expect("dest");
            assert!(rank[&s] < rank[&d], "{source} must precede {dest}");
        }
    }

    #[test]
    fn trunk_of_chain() {
        let sg = chain();
        assert_eq!(select_trunk(&sg).expect("trunk"), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn trunk_prefers_longest_pair() {
        let sg = branched();
        // A→C is 1 hop, A→B→D is 2 hops.
        assert_eq!(select_trunk(&sg).expect("trunk"), vec!["A", "B", "D"]);
    }

    #[test]
    fn trunk_tie_breaks_lexicographically() {
        // Two disjoint one-hop chains tie; the (A, B) pair wins.
        let sg = graph_for(
            vec![
                vec![0.0, 0.10, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.0],
                vec![0.0, 0.0, 0.0, 0.10],
                vec![0.0, 0.0, 0.0, 0.0],
            ],
            &["A", "B", "C", "D"],
        );
        assert_eq!(select_trunk(&sg).expect("trunk"), vec!["A", "B"]);
    }

    #[test]
    fn side_branch_rides_with_trunk_anchor() {
        let sg = branched();
        let trunk = select_trunk(&sg).expect("trunk");
        let (depth_map, tiers) = assign_depths(&sg, &trunk);

        assert_eq!(depth_map["A"], 0);
        assert_eq!(depth_map["B"], 1);
        assert_eq!(depth_map["D"], 2);
        // C carries the depth of the most recent trunk node A.
        assert_eq!(depth_map["C"], 0);

        assert_eq!(tiers[&0], vec!["A", "C"]);
        assert_eq!(tiers[&1], vec!["B"]);
        assert_eq!(tiers[&2], vec!["D"]);
    }

    #[test]
    fn trunk_depths_increase_by_one() {
        let sg = chain();
        let trunk = select_trunk(&sg).expect("trunk");
        let (depth_map, _) = assign_depths(&sg, &trunk);
        for (k, label) in trunk.iter().enumerate() {
            assert_eq!(depth_map[label], k);
        }
    }
}
