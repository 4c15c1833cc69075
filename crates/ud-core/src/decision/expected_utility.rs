//! Expected utility of each decision and the resulting recommendation.
//!
//! ```text
//! EU(d) = P(Rain)·U[Rain, d] + P(Sunny)·U[Sunny, d]
//! ```

use crate::evaluate::EvaluationError;
use crate::inference::Weather;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use ud_math::mix;

/// Lowest admissible utility.
pub const UTILITY_MIN: f64 = 0.0;
/// Highest admissible utility.
pub const UTILITY_MAX: f64 = 100.0;

/// What the decision maker can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Umbrella,
    NoUmbrella,
}

impl Decision {
    pub const ALL: [Decision; 2] = [Decision::Umbrella, Decision::NoUmbrella];

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Umbrella => "umbrella",
            Decision::NoUmbrella => "no_umbrella",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The action the evaluator recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    TakeUmbrella,
    LeaveUmbrella,
}

impl Recommendation {
    /// The decision this recommendation carries out.
    pub fn decision(&self) -> Decision {
        match self {
            Recommendation::TakeUmbrella => Decision::Umbrella,
            Recommendation::LeaveUmbrella => Decision::NoUmbrella,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::TakeUmbrella => "take_umbrella",
            Recommendation::LeaveUmbrella => "leave_umbrella",
        }
    }

    /// Short phrase for human output.
    pub fn phrase(&self) -> &'static str {
        match self {
            Recommendation::TakeUmbrella => "Take the umbrella",
            Recommendation::LeaveUmbrella => "Leave the umbrella at home",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Utility of every (weather, decision) outcome on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UtilityTable {
    pub rain_umbrella: f64,
    pub rain_no_umbrella: f64,
    pub sunny_umbrella: f64,
    pub sunny_no_umbrella: f64,
}

impl Default for UtilityTable {
    fn default() -> Self {
        UtilityTable {
            rain_umbrella: 70.0,
            rain_no_umbrella: 0.0,
            sunny_umbrella: 20.0,
            sunny_no_umbrella: 100.0,
        }
    }
}

impl UtilityTable {
    pub fn get(&self, weather: Weather, decision: Decision) -> f64 {
        match (weather, decision) {
            (Weather::Rain, Decision::Umbrella) => self.rain_umbrella,
            (Weather::Rain, Decision::NoUmbrella) => self.rain_no_umbrella,
            (Weather::Sunny, Decision::Umbrella) => self.sunny_umbrella,
            (Weather::Sunny, Decision::NoUmbrella) => self.sunny_no_umbrella,
        }
    }

    /// Reject any entry that is non-finite or outside [0, 100].
    pub fn validate(&self) -> Result<(), EvaluationError> {
        for weather in Weather::ALL {
            for decision in Decision::ALL {
                let value = self.get(weather, decision);
                if !value.is_finite() || !(UTILITY_MIN..=UTILITY_MAX).contains(&value) {
                    return Err(EvaluationError::InvalidUtility {
                        weather,
                        decision,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

impl From<&ud_config::UtilityModel> for UtilityTable {
    fn from(model: &ud_config::UtilityModel) -> Self {
        UtilityTable {
            rain_umbrella: model.rain_umbrella,
            rain_no_umbrella: model.rain_no_umbrella,
            sunny_umbrella: model.sunny_umbrella,
            sunny_no_umbrella: model.sunny_no_umbrella,
        }
    }
}

/// EU of one decision given P(Rain).
pub fn expected_utility(posterior_rain: f64, utilities: &UtilityTable, decision: Decision) -> f64 {
    mix(
        posterior_rain,
        utilities.get(Weather::Rain, decision),
        utilities.get(Weather::Sunny, decision),
    )
}

/// Take the umbrella only when it is strictly better; ties leave it.
pub fn recommend(eu_umbrella: f64, eu_no_umbrella: f64) -> Recommendation {
    if eu_umbrella > eu_no_umbrella {
        Recommendation::TakeUmbrella
    } else {
        Recommendation::LeaveUmbrella
    }
}

/// Recommendation and its EU at a given belief.
pub fn best_decision(posterior_rain: f64, utilities: &UtilityTable) -> (Recommendation, f64) {
    let eu_umbrella = expected_utility(posterior_rain, utilities, Decision::Umbrella);
    let eu_no_umbrella = expected_utility(posterior_rain, utilities, Decision::NoUmbrella);
    let recommendation = recommend(eu_umbrella, eu_no_umbrella);
    let best = match recommendation {
        Recommendation::TakeUmbrella => eu_umbrella,
        Recommendation::LeaveUmbrella => eu_no_umbrella,
    };
    (recommendation, best)
}
