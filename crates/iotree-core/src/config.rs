//! Pipeline configuration.
//!
//! Loaded from a TOML file or constructed with [`PipelineConfig::default`].
//! The edge threshold and the cycle-removal policy are configuration, never
//! hard-coded constants.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which cycle-removal policy the resolver applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Remove nothing; any detected cycle aborts the pipeline.
    #[default]
    Strict,
    /// Remove the minimum-weight edge within each cycle.
    Lightest,
    /// Remove the hand-authored edges listed in `named_removals`.
    Named,
}

/// Tunables for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum coefficient for an entry to become an edge.
    ///
    /// 0.05 was chosen empirically as an economically significant input
    /// share for the target dataset.
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Cycle-removal policy selection.
    #[serde(default)]
    pub policy: PolicyKind,

    /// `(source, dest)` edges removed under the `named` policy.
    ///
    /// Dataset-specific exceptions, e.g. breaking the electricity ↔ fossil
    /// fuel extraction loop by dropping one declared direction.
    #[serde(default)]
    pub named_removals: Vec<(String, String)>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            policy: PolicyKind::default(),
            named_removals: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
    }
}

const fn default_threshold() -> f32 {
    0.05
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert!((config.threshold - 0.05).abs() < f32::EPSILON);
        assert_eq!(config.policy, PolicyKind::Strict);
        assert!(config.named_removals.is_empty());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: PipelineConfig = toml::from_str("").expect("parse empty");
        assert!((config.threshold - 0.05).abs() < f32::EPSILON);
        assert_eq!(config.policy, PolicyKind::Strict);
    }

    #[test]
    fn full_toml_round_trip() {
        let text = r#"
threshold = 0.08
policy = "named"
named_removals = [["Electricity", "Fossil fuel extraction"]]
"#;
        let config: PipelineConfig = toml::from_str(text).expect("parse");
        assert!((config.threshold - 0.08).abs() < f32::EPSILON);
        assert_eq!(config.policy, PolicyKind::Named);
        assert_eq!(
            config.named_removals,
            vec![(
                "Electricity".to_string(),
                "Fossil fuel extraction".to_string()
            )]
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("iotree.toml");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "threshold = 0.1\npolicy = \"lightest\"").expect("write");

        let config = PipelineConfig::load(&path).expect("load");
        assert!((config.threshold - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.policy, PolicyKind::Lightest);
    }

    #[test]
    fn load_missing_file_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(PipelineConfig::load(&dir.path().join("absent.toml")).is_err());
    }
}
