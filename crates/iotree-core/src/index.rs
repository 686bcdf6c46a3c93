//! Label ↔ matrix-index bijection.
//!
//! One [`LabelIndex`] is built per table and passed by reference everywhere
//! a position lookup is needed, so label order and matrix index can never
//! drift apart after nodes are excluded downstream.

use std::collections::HashMap;

/// Errors raised while building a [`LabelIndex`].
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The same sector label appeared for two different matrix indices.
    #[error("duplicate sector label: {0}")]
    DuplicateLabel(String),
}

/// Bijective mapping between sector labels and matrix row/column indices.
///
/// Fixed for the lifetime of one pipeline run.
#[derive(Debug, Clone)]
pub struct LabelIndex {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl LabelIndex {
    /// Build the bijection from an ordered label list.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::DuplicateLabel`] if any label occurs twice —
    /// labels are identities, so duplicates would make the mapping
    /// ambiguous.
    pub fn new(labels: &[String]) -> Result<Self, IndexError> {
        let mut positions = HashMap::with_capacity(labels.len());
        for (ix, label) in labels.iter().enumerate() {
            if positions.insert(label.clone(), ix).is_some() {
                return Err(IndexError::DuplicateLabel(label.clone()));
            }
        }
        Ok(Self {
            labels: labels.to_vec(),
            positions,
        })
    }

    /// Matrix index of `label`, if present.
    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Label at matrix index `ix`, if in range.
    #[must_use]
    pub fn label_of(&self, ix: usize) -> Option<&str> {
        self.labels.get(ix).map(String::as_str)
    }

    /// Number of sectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Return `true` if the index holds no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// All labels in matrix order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn round_trips_label_and_index() {
        let ix = LabelIndex::new(&labels(&["agriculture", "steel", "retail"])).expect("build");

        assert_eq!(ix.len(), 3);
        assert_eq!(ix.index_of("steel"), Some(1));
        assert_eq!(ix.label_of(1), Some("steel"));
        assert_eq!(ix.index_of("missing"), None);
        assert_eq!(ix.label_of(3), None);
    }

    #[test]
    fn duplicate_label_rejected() {
        let err = LabelIndex::new(&labels(&["steel", "retail", "steel"]))
            .expect_err("duplicates must fail");
        assert!(matches!(err, IndexError::DuplicateLabel(l) if l == "steel"));
    }

    #[test]
    fn empty_index_is_empty() {
        let ix = LabelIndex::new(&[]).expect("build");
        assert!(ix.is_empty());
        assert_eq!(ix.len(), 0);
    }
}
