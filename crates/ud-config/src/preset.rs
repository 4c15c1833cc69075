//! Built-in models for common teaching scenarios.
//!
//! - Classic: the lecture numbers
//! - Cautious: hates getting wet, does not mind carrying an umbrella
//! - Carefree: hates carrying an umbrella when it stays dry
//! - PerfectForecast: the forecast is never wrong

use crate::model::{ForecastModel, Model, UtilityModel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Available presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetName {
    /// Prior 0.3, reliability 0.8/0.2, utilities 70/0/20/100
    Classic,
    /// Getting wet is worthless, carrying an umbrella on a dry day is fine
    Cautious,
    /// Carrying an umbrella on a dry day is worthless
    Carefree,
    /// Reliability 1.0/0.0
    PerfectForecast,
}

impl PresetName {
    /// All available preset names.
    pub const ALL: &'static [PresetName] = &[
        PresetName::Classic,
        PresetName::Cautious,
        PresetName::Carefree,
        PresetName::PerfectForecast,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetName::Classic => "classic",
            PresetName::Cautious => "cautious",
            PresetName::Carefree => "carefree",
            PresetName::PerfectForecast => "perfect-forecast",
        }
    }

    /// Parse preset name from string.
    pub fn parse(s: &str) -> Option<PresetName> {
        match s.to_lowercase().as_str() {
            "classic" | "default" | "lecture" => Some(PresetName::Classic),
            "cautious" | "careful" => Some(PresetName::Cautious),
            "carefree" | "relaxed" => Some(PresetName::Carefree),
            "perfect-forecast" | "perfect_forecast" | "perfect" => {
                Some(PresetName::PerfectForecast)
            }
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            PresetName::Classic => "Lecture defaults: prior 0.3, forecast 0.8/0.2, utilities 70/0/20/100",
            PresetName::Cautious => {
                "Getting wet is worth nothing; an umbrella on a dry day is worth 60"
            }
            PresetName::Carefree => "An umbrella on a dry day is worth nothing",
            PresetName::PerfectForecast => "The forecast is always right: P(Good|Rain)=1, P(Good|Sunny)=0",
        }
    }
}

impl fmt::Display for PresetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PresetName {
    type Err = PresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetName::parse(s).ok_or_else(|| PresetError::UnknownPreset(s.to_string()))
    }
}

/// Errors related to preset operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    /// Unknown preset name.
    UnknownPreset(String),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::UnknownPreset(name) => {
                write!(
                    f,
                    "Unknown preset '{}'. Available: {}",
                    name,
                    PresetName::ALL
                        .iter()
                        .map(|p| p.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
        }
    }
}

impl std::error::Error for PresetError {}

/// Build the model for a preset.
pub fn get_preset(name: PresetName) -> Model {
    let classic = Model::default();
    let model = match name {
        PresetName::Classic => classic,
        PresetName::Cautious => Model {
            utilities: UtilityModel {
                rain_no_umbrella: 0.0,
                sunny_umbrella: 60.0,
                ..UtilityModel::default()
            },
            ..classic
        },
        PresetName::Carefree => Model {
            utilities: UtilityModel {
                sunny_umbrella: 0.0,
                ..UtilityModel::default()
            },
            ..classic
        },
        PresetName::PerfectForecast => Model {
            forecast: ForecastModel {
                p_good_given_rain: 1.0,
                p_good_given_sunny: 0.0,
            },
            ..classic
        },
    };
    Model {
        description: Some(format!("preset: {}", name.as_str())),
        ..model
    }
}

/// Information about a preset for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetInfo {
    pub name: String,
    pub description: String,
    pub prior_rain: f64,
    pub forecast: ForecastModel,
    pub utilities: UtilityModel,
}

impl PresetInfo {
    pub fn from_preset(name: PresetName) -> Self {
        let model = get_preset(name);
        Self {
            name: name.as_str().to_string(),
            description: name.description().to_string(),
            prior_rain: model.prior_rain,
            forecast: model.forecast,
            utilities: model.utilities,
        }
    }
}

/// List all available presets with summary information.
pub fn list_presets() -> Vec<PresetInfo> {
    PresetName::ALL
        .iter()
        .map(|&name| PresetInfo::from_preset(name))
        .collect()
}
