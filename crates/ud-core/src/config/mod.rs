//! Model loading for ud-core.
//!
//! This module handles:
//! - Resolving the model file (CLI > env > XDG > /etc)
//! - Falling back to a preset when no file is found
//! - Semantic validation of the loaded model
//! - Config snapshots for JSON output

pub use ud_config::resolve::{ConfigSource, ModelPath};
pub use ud_config::{
    get_preset, list_presets, ConfigSnapshot, Model, PresetError, PresetInfo, PresetName,
    ValidationError,
};

use std::path::{Path, PathBuf};
use thiserror::Error;
use ud_config::validate::validate_model;

/// Errors that can occur while loading the model.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Model file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in model file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Semantic validation failed: {0}")]
    Validation(ValidationError),

    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::VersionMismatch { expected, actual } => {
                ConfigError::VersionMismatch { expected, actual }
            }
            other => ConfigError::Validation(other),
        }
    }
}

impl From<ConfigError> for ud_common::Error {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        match err {
            ConfigError::NotFound { .. } => ud_common::Error::Config(message),
            ConfigError::Io { source, .. } => ud_common::Error::Io(source),
            ConfigError::Parse { .. } => ud_common::Error::InvalidModel(message),
            ConfigError::Validation(inner) => ud_common::Error::InvalidModel(inner.to_string()),
            ConfigError::VersionMismatch { expected, actual } => {
                ud_common::Error::SchemaVersion { expected, actual }
            }
        }
    }
}

/// Model resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// `--config` directory.
    pub config_dir: Option<PathBuf>,
    /// `--model` file.
    pub model_path: Option<PathBuf>,
    /// Base model when no file is found. Classic when unset.
    pub preset: Option<PresetName>,
}

/// A loaded model with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model: Model,
    /// Where the model came from.
    pub location: ModelPath,
    /// Preset the model was built from, when no file was found.
    pub preset: Option<PresetName>,
    /// Raw file text, kept for hashing.
    content: Option<String>,
}

impl ResolvedConfig {
    /// Create a config snapshot for JSON output.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot::new(&self.model, &self.location, self.content.as_deref())
    }

    pub fn from_file(&self) -> bool {
        self.location.path.is_some()
    }
}

/// Load the model with the standard resolution order.
///
/// A file named on the command line or in `UD_MODEL` must exist. A found
/// file always wins over the preset.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    let location = ud_config::resolve_model(
        options.model_path.as_deref(),
        options.config_dir.as_deref(),
    );
    load_from(location, options.preset)
}

/// Load the model at a resolved location.
///
/// A named file must exist. A discovered file that has since disappeared
/// falls through to the preset.
fn load_from(
    location: ModelPath,
    preset: Option<PresetName>,
) -> Result<ResolvedConfig, ConfigError> {
    let path = match location.path.clone() {
        Some(path) if location.source.is_explicit() || path.exists() => path,
        _ => {
            let preset = preset.unwrap_or(PresetName::Classic);
            return Ok(ResolvedConfig {
                model: get_preset(preset),
                location: ModelPath::default(),
                preset: Some(preset),
                content: None,
            });
        }
    };

    let (model, content) = load_model_file(&path)?;
    validate_model(&model)?;

    Ok(ResolvedConfig {
        model,
        location,
        preset: None,
        content: Some(content),
    })
}

/// Read and parse a model file without semantic validation.
///
/// Returns the model together with the raw file text.
pub fn load_model_file(path: &Path) -> Result<(Model, String), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let model = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok((model, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let options = ConfigOptions {
            model_path: Some(temp.path().join("absent.json")),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn vanished_discovered_file_falls_back_to_preset() {
        let temp = TempDir::new().unwrap();
        let location = ModelPath {
            path: Some(temp.path().join("model.json")),
            source: ConfigSource::XdgConfig,
        };
        let resolved = load_from(location, Some(PresetName::Cautious)).unwrap();
        assert_eq!(resolved.preset, Some(PresetName::Cautious));
        assert_eq!(resolved.location, ModelPath::default());
        assert!(!resolved.from_file());
    }

    #[test]
    fn missing_environment_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let location = ModelPath {
            path: Some(temp.path().join("model.json")),
            source: ConfigSource::Environment,
        };
        let err = load_from(location, Some(PresetName::Cautious)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn explicit_file_beats_preset() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("model.json");
        std::fs::write(&path, r#"{"schema_version": "1.0.0", "prior_rain": 0.45}"#).unwrap();

        let options = ConfigOptions {
            model_path: Some(path.clone()),
            preset: Some(PresetName::Carefree),
            ..Default::default()
        };
        let resolved = load_config(&options).unwrap();
        assert_eq!(resolved.model.prior_rain, 0.45);
        assert_eq!(resolved.preset, None);
        assert!(resolved.from_file());
        assert_eq!(resolved.location.source, ConfigSource::CliArgument);

        let snapshot = resolved.snapshot();
        assert_eq!(
            snapshot.hash,
            ud_config::snapshot::hash_content(&std::fs::read_to_string(&path).unwrap())
        );
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("model.json");
        std::fs::write(&path, "{ nope").unwrap();
        let err = load_model_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let common: ud_common::Error = err.into();
        assert_eq!(common.code(), 11);
    }

    #[test]
    fn out_of_range_value_is_validation_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("model.json");
        std::fs::write(&path, r#"{"schema_version": "1.0.0", "prior_rain": 0}"#).unwrap();

        let options = ConfigOptions {
            model_path: Some(path),
            ..Default::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn version_mismatch_maps_through() {
        let err = ConfigError::from(ValidationError::VersionMismatch {
            expected: "1.0.0".into(),
            actual: "2.0.0".into(),
        });
        assert!(matches!(err, ConfigError::VersionMismatch { .. }));

        let common: ud_common::Error = err.into();
        assert!(matches!(common, ud_common::Error::SchemaVersion { .. }));
    }

    #[test]
    fn not_found_maps_to_config_error() {
        let common: ud_common::Error = ConfigError::NotFound {
            path: PathBuf::from("/nowhere/model.json"),
        }
        .into();
        assert_eq!(common.code(), 10);
        assert!(common.to_string().contains("/nowhere/model.json"));
    }
}
