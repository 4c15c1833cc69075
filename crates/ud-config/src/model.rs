//! The `model.json` file: prior, forecast reliability and utility table.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::ValidationError;

/// A complete umbrella decision model.
///
/// Every section except `schema_version` may be omitted; omitted sections
/// take the classic lecture values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Model {
    pub schema_version: String,

    /// Free-form note about where the numbers came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// P(Rain) before any forecast is observed.
    #[serde(default = "default_prior_rain")]
    pub prior_rain: f64,

    #[serde(default)]
    pub forecast: ForecastModel,

    #[serde(default)]
    pub utilities: UtilityModel,
}

/// Forecast reliability. P(Bad|·) is the complement of each field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastModel {
    pub p_good_given_rain: f64,
    pub p_good_given_sunny: f64,
}

/// Utility of each (weather, decision) outcome, on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UtilityModel {
    pub rain_umbrella: f64,
    pub rain_no_umbrella: f64,
    pub sunny_umbrella: f64,
    pub sunny_no_umbrella: f64,
}

fn default_prior_rain() -> f64 {
    0.3
}

impl Default for ForecastModel {
    fn default() -> Self {
        ForecastModel {
            p_good_given_rain: 0.8,
            p_good_given_sunny: 0.2,
        }
    }
}

impl Default for UtilityModel {
    fn default() -> Self {
        UtilityModel {
            rain_umbrella: 70.0,
            rain_no_umbrella: 0.0,
            sunny_umbrella: 20.0,
            sunny_no_umbrella: 100.0,
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Model {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            description: None,
            prior_rain: default_prior_rain(),
            forecast: ForecastModel::default(),
            utilities: UtilityModel::default(),
        }
    }
}

impl UtilityModel {
    /// Entries as `(field name, value)` pairs in a fixed order.
    pub fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("rain_umbrella", self.rain_umbrella),
            ("rain_no_umbrella", self.rain_no_umbrella),
            ("sunny_umbrella", self.sunny_umbrella),
            ("sunny_no_umbrella", self.sunny_no_umbrella),
        ]
    }
}

impl Model {
    /// Load a model from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_str(&content)
    }

    /// Parse a model from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// Pretty JSON suitable for writing back to `model.json`.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
