//! Config snapshots for output provenance.
//!
//! A snapshot records which model an evaluation used and where it came
//! from, so a JSON result can be traced back to its inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::model::Model;
use crate::resolve::ModelPath;

/// A frozen snapshot of the model in use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// When this snapshot was taken.
    pub timestamp: DateTime<Utc>,

    /// Schema version of the model.
    pub schema_version: String,

    /// Where the model came from.
    pub source: String,

    /// Path the model was loaded from.
    #[serde(default)]
    pub path: Option<String>,

    /// SHA-256 of the file content, or of the canonical JSON of a
    /// built-in model.
    pub hash: String,

    /// Key model values for quick reference.
    pub summary: ModelSummary,
}

/// Summary of key model values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub prior_rain: f64,
    pub p_good_given_rain: f64,
    pub p_good_given_sunny: f64,
    /// Utilities in the order rain/umbrella, rain/no umbrella,
    /// sunny/umbrella, sunny/no umbrella.
    pub utilities: [f64; 4],
}

impl From<&Model> for ModelSummary {
    fn from(model: &Model) -> Self {
        ModelSummary {
            prior_rain: model.prior_rain,
            p_good_given_rain: model.forecast.p_good_given_rain,
            p_good_given_sunny: model.forecast.p_good_given_sunny,
            utilities: model.utilities.entries().map(|(_, v)| v),
        }
    }
}

impl ConfigSnapshot {
    /// Snapshot a loaded model. `content` is the raw file text when the
    /// model was read from disk.
    pub fn new(model: &Model, location: &ModelPath, content: Option<&str>) -> Self {
        let hash = match content {
            Some(text) => hash_content(text),
            None => canonical_hash(model),
        };

        ConfigSnapshot {
            timestamp: Utc::now(),
            schema_version: model.schema_version.clone(),
            source: location.source.to_string(),
            path: location.path.as_ref().map(|p| p.display().to_string()),
            hash,
            summary: ModelSummary::from(model),
        }
    }

    /// Snapshot of the built-in model.
    pub fn defaults_only() -> Self {
        Self::new(&Model::default(), &ModelPath::default(), None)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check if this snapshot describes the same model content.
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.hash == other.hash
    }

    /// First 12 characters of the hash.
    pub fn short_id(&self) -> &str {
        &self.hash[..12.min(self.hash.len())]
    }
}

/// Hash content with SHA-256 and return hex string.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

fn canonical_hash(model: &Model) -> String {
    // Field order is fixed by the struct definition, so this is stable.
    let json = serde_json::to_string(model).unwrap_or_default();
    hash_content(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ConfigSource;
    use std::path::PathBuf;

    #[test]
    fn test_defaults_snapshot() {
        let snapshot = ConfigSnapshot::defaults_only();
        assert_eq!(snapshot.schema_version, crate::CONFIG_SCHEMA_VERSION);
        assert_eq!(snapshot.source, "builtin default");
        assert!(snapshot.path.is_none());
        assert_eq!(snapshot.summary.utilities, [70.0, 0.0, 20.0, 100.0]);
    }

    #[test]
    fn test_snapshot_short_id() {
        let snapshot = ConfigSnapshot::defaults_only();
        assert_eq!(snapshot.short_id().len(), 12);
    }

    #[test]
    fn test_defaults_snapshots_match() {
        let s1 = ConfigSnapshot::defaults_only();
        let s2 = ConfigSnapshot::defaults_only();
        assert!(s1.matches(&s2));
    }

    #[test]
    fn test_different_models_do_not_match() {
        let other = Model {
            prior_rain: 0.5,
            ..Model::default()
        };
        let s1 = ConfigSnapshot::defaults_only();
        let s2 = ConfigSnapshot::new(&other, &ModelPath::default(), None);
        assert!(!s1.matches(&s2));
    }

    #[test]
    fn test_file_snapshot_hashes_content() {
        let text = r#"{"schema_version": "1.0.0"}"#;
        let location = ModelPath {
            path: Some(PathBuf::from("/tmp/model.json")),
            source: ConfigSource::CliArgument,
        };
        let snapshot = ConfigSnapshot::new(&Model::default(), &location, Some(text));
        assert_eq!(snapshot.hash, hash_content(text));
        assert_eq!(snapshot.path.as_deref(), Some("/tmp/model.json"));
        assert_eq!(snapshot.source, "CLI argument");
    }

    #[test]
    fn test_hash_content() {
        let hash1 = hash_content("test");
        let hash2 = hash_content("test");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_snapshot_json_roundtrip() {
        let snapshot = ConfigSnapshot::defaults_only();
        let json = snapshot.to_json().unwrap();
        let restored = ConfigSnapshot::from_json(&json).unwrap();
        assert!(snapshot.matches(&restored));
        assert_eq!(restored.summary, snapshot.summary);
    }
}
