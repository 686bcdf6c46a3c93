//! Typed diagnostics returned alongside the primary result.
//!
//! Non-fatal observations (skipped self-loops, detected cycles, edges a
//! policy removed) travel with the [`crate::Layering`] as data, so callers
//! and tests can inspect them without parsing console text.

use std::fmt;

use serde::Serialize;

/// One non-fatal observation from a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A self-dependency entry cleared the threshold; self-loops are never
    /// represented as edges.
    SelfLoopSkipped {
        /// Sector whose diagonal entry was dropped.
        label: String,
        /// The dropped coefficient.
        weight: f32,
    },

    /// A cycle was present in the extracted graph before resolution.
    CycleDetected {
        /// Sorted labels of the cycle's members.
        members: Vec<String>,
    },

    /// The resolve policy removed this edge to break a cycle.
    EdgeRemoved {
        /// Edge source label.
        source: String,
        /// Edge destination label.
        dest: String,
        /// Weight of the removed edge.
        weight: f32,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoopSkipped { label, weight } => {
                write!(f, "skipped self-loop on {label} (weight {weight})")
            }
            Self::CycleDetected { members } => {
                write!(f, "cycle detected: {}", members.join(" → "))
            }
            Self::EdgeRemoved {
                source,
                dest,
                weight,
            } => {
                write!(f, "removed edge {source} → {dest} (weight {weight})")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let diag = Diagnostic::SelfLoopSkipped {
            label: "Steel".to_string(),
            weight: 0.9,
        };
        let json = serde_json::to_value(&diag).expect("serialize");
        assert_eq!(json["kind"], "self_loop_skipped");
        assert_eq!(json["label"], "Steel");
    }

    #[test]
    fn display_is_human_readable() {
        let diag = Diagnostic::EdgeRemoved {
            source: "Electricity".to_string(),
            dest: "Coal".to_string(),
            weight: 0.07,
        };
        assert_eq!(
            diag.to_string(),
            "removed edge Electricity → Coal (weight 0.07)"
        );
    }
}
