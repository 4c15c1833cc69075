//! Model file resolution and path discovery.
//!
//! Resolution order: CLI arguments → environment variables → XDG paths →
//! /etc → built-in defaults.

use std::path::{Path, PathBuf};

/// A resolved model file location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPath {
    /// Path to model.json, or None when the built-in model applies.
    pub path: Option<PathBuf>,

    /// Where the path came from.
    pub source: ConfigSource,
}

/// Where a model file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/umbrella-decision/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl ConfigSource {
    /// Whether the user named this file directly, so that a missing file
    /// is an error rather than a reason to keep searching.
    pub fn is_explicit(&self) -> bool {
        matches!(self, ConfigSource::CliArgument | ConfigSource::Environment)
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable names.
pub const ENV_MODEL_PATH: &str = "UD_MODEL";
pub const ENV_CONFIG_DIR: &str = "UD_CONFIG_DIR";

/// Standard model file name.
pub const MODEL_FILENAME: &str = "model.json";

/// Application name for XDG directories.
const APP_NAME: &str = "umbrella-decision";

/// Resolve the model file path.
///
/// 1. Explicit `--model` path (returned even if it does not exist)
/// 2. `--config` directory + model.json, if present
/// 3. UD_MODEL (returned even if it does not exist)
/// 4. UD_CONFIG_DIR + model.json, if present
/// 5. XDG config directory (~/.config/umbrella-decision/model.json)
/// 6. System config (/etc/umbrella-decision/model.json)
/// 7. Built-in defaults (None)
pub fn resolve_model(cli_model: Option<&Path>, cli_config_dir: Option<&Path>) -> ModelPath {
    if let Some(path) = cli_model {
        return found(path.to_path_buf(), ConfigSource::CliArgument);
    }

    if let Some(dir) = cli_config_dir {
        let path = dir.join(MODEL_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::CliArgument);
        }
    }

    if let Some(env_path) = non_empty_env(ENV_MODEL_PATH) {
        return found(PathBuf::from(env_path), ConfigSource::Environment);
    }

    if let Some(config_dir) = non_empty_env(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(MODEL_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(MODEL_FILENAME);
        if path.exists() {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(MODEL_FILENAME);
    if system_path.exists() {
        return found(system_path, ConfigSource::SystemConfig);
    }

    ModelPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ModelPath {
    ModelPath {
        path: Some(path),
        source,
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get the XDG config directory for umbrella-decision.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(format!("{}", ConfigSource::CliArgument), "CLI argument");
        assert_eq!(
            format!("{}", ConfigSource::Environment),
            "environment variable"
        );
        assert_eq!(format!("{}", ConfigSource::XdgConfig), "XDG config");
        assert_eq!(format!("{}", ConfigSource::SystemConfig), "system config");
        assert_eq!(
            format!("{}", ConfigSource::BuiltinDefault),
            "builtin default"
        );
    }

    #[test]
    fn test_explicit_sources() {
        assert!(ConfigSource::CliArgument.is_explicit());
        assert!(ConfigSource::Environment.is_explicit());
        assert!(!ConfigSource::XdgConfig.is_explicit());
        assert!(!ConfigSource::BuiltinDefault.is_explicit());
    }

    #[test]
    fn test_cli_model_returned_even_if_missing() {
        let path = Path::new("/nonexistent/model.json");
        let resolved = resolve_model(Some(path), None);
        assert_eq!(resolved.path.as_deref(), Some(path));
        assert_eq!(resolved.source, ConfigSource::CliArgument);
    }

    #[test]
    fn test_system_config_dir() {
        assert_eq!(system_config_dir(), PathBuf::from("/etc/umbrella-decision"));
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }
}
