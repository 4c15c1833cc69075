//! Umbrella Decision model configuration.
//!
//! This crate provides:
//! - The typed `model.json` structure (prior, forecast reliability, utilities)
//! - Built-in presets
//! - Model file resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation
//! - Config snapshots for output provenance

pub mod model;
pub mod preset;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use model::{ForecastModel, Model, UtilityModel};
pub use preset::{get_preset, list_presets, PresetError, PresetInfo, PresetName};
pub use resolve::{resolve_model, ConfigSource, ModelPath};
pub use snapshot::ConfigSnapshot;
pub use validate::{validate_model, ValidationError, ValidationResult};

/// Schema version for model files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
