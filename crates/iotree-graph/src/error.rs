//! Error taxonomy for the layering pipeline.
//!
//! Every variant is fatal for the run: the pipeline either produces a
//! complete, internally consistent [`crate::Layering`] or aborts with one
//! of these. A graph known to still contain cycles is never handed to the
//! depth engine.

/// Errors raised by the graph pipeline.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Malformed input: duplicate labels or a non-finite threshold.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The label count does not match the matrix dimension.
    #[error("{labels} labels for a {n}×{n} matrix")]
    SizeMismatch {
        /// Number of sector labels supplied.
        labels: usize,
        /// Matrix dimension.
        n: usize,
    },

    /// The configured removal policy failed to produce a DAG after one
    /// rewrite pass. Carries the surviving cycle memberships for diagnosis.
    #[error("cycles persist after one resolution pass: {cycles:?}")]
    CyclePersists {
        /// Sorted member lists of the cycles that survived resolution.
        cycles: Vec<Vec<String>>,
    },

    /// No path exists between any source and any sink; the graph is too
    /// fragmented to anchor a trunk.
    #[error("no source-to-sink path exists")]
    NoTrunk,

    /// A node has neither incoming nor outgoing edges yet sits in the node
    /// set — it registers as both a source and a sink.
    #[error("degenerate graph: {node} is both a source and a sink")]
    DegenerateGraph {
        /// The isolated node's label.
        node: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cycle_members() {
        let err = GraphError::CyclePersists {
            cycles: vec![vec!["Electricity".to_string(), "Fossil fuel".to_string()]],
        };
        let text = err.to_string();
        assert!(text.contains("Electricity"), "got: {text}");
        assert!(text.contains("Fossil fuel"), "got: {text}");
    }

    #[test]
    fn display_names_degenerate_node() {
        let err = GraphError::DegenerateGraph {
            node: "Retail".to_string(),
        };
        assert!(err.to_string().contains("Retail"));
    }
}
