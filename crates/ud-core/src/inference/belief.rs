//! Bayes update of the weather belief given one forecast observation.
//!
//! ```text
//! P(Rain | Good) = a·p / (a·p + b·(1−p))
//! P(Rain | Bad)  = (1−a)·p / ((1−a)·p + (1−b)·(1−p))
//! ```
//!
//! with `p = P(Rain)`, `a = P(Good|Rain)`, `b = P(Good|Sunny)`.

use crate::evaluate::EvaluationError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use ud_math::{complement, is_open_unit_interval, is_unit_interval, mix};

/// The hidden weather state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    Rain,
    Sunny,
}

impl Weather {
    pub const ALL: [Weather; 2] = [Weather::Rain, Weather::Sunny];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weather::Rain => "rain",
            Weather::Sunny => "sunny",
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the forecaster said, if anything.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ForecastObservation {
    /// No forecast consulted; the belief stays at the prior.
    #[default]
    None,
    Good,
    Bad,
}

impl ForecastObservation {
    /// The two observations a consulted forecast can produce.
    pub const OUTCOMES: [ForecastObservation; 2] =
        [ForecastObservation::Good, ForecastObservation::Bad];

    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastObservation::None => "none",
            ForecastObservation::Good => "good",
            ForecastObservation::Bad => "bad",
        }
    }

    pub fn is_observed(&self) -> bool {
        !matches!(self, ForecastObservation::None)
    }
}

impl fmt::Display for ForecastObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Belief about the weather before any forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Prior {
    /// P(Rain). Must lie strictly inside (0, 1).
    pub rain: f64,
}

impl Prior {
    pub fn new(rain: f64) -> Self {
        Prior { rain }
    }

    pub fn sunny(&self) -> f64 {
        complement(self.rain)
    }

    pub fn probability(&self, weather: Weather) -> f64 {
        match weather {
            Weather::Rain => self.rain,
            Weather::Sunny => self.sunny(),
        }
    }

    pub fn validate(&self) -> Result<(), EvaluationError> {
        if !is_open_unit_interval(self.rain) {
            return Err(EvaluationError::InvalidProbability {
                field: "prior_rain",
                value: self.rain,
                expected: "in (0, 1)",
            });
        }
        Ok(())
    }
}

impl Default for Prior {
    fn default() -> Self {
        Prior { rain: 0.3 }
    }
}

/// How well the forecast tracks the weather.
///
/// Only P(Good|·) is stored; P(Bad|·) is its complement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastReliability {
    pub p_good_given_rain: f64,
    pub p_good_given_sunny: f64,
}

impl Default for ForecastReliability {
    fn default() -> Self {
        ForecastReliability {
            p_good_given_rain: 0.8,
            p_good_given_sunny: 0.2,
        }
    }
}

impl ForecastReliability {
    pub fn new(p_good_given_rain: f64, p_good_given_sunny: f64) -> Self {
        ForecastReliability {
            p_good_given_rain,
            p_good_given_sunny,
        }
    }

    /// P(observation | weather). An unobserved forecast has likelihood 1.
    pub fn likelihood(&self, observation: ForecastObservation, weather: Weather) -> f64 {
        let p_good = match weather {
            Weather::Rain => self.p_good_given_rain,
            Weather::Sunny => self.p_good_given_sunny,
        };
        match observation {
            ForecastObservation::None => 1.0,
            ForecastObservation::Good => p_good,
            ForecastObservation::Bad => complement(p_good),
        }
    }

    /// True when the forecast carries no information about the weather.
    pub fn is_uninformative(&self) -> bool {
        self.p_good_given_rain == self.p_good_given_sunny
    }

    pub fn validate(&self) -> Result<(), EvaluationError> {
        for (field, value) in [
            ("p_good_given_rain", self.p_good_given_rain),
            ("p_good_given_sunny", self.p_good_given_sunny),
        ] {
            if !is_unit_interval(value) {
                return Err(EvaluationError::InvalidProbability {
                    field,
                    value,
                    expected: "in [0, 1]",
                });
            }
        }
        Ok(())
    }
}

/// Marginal probability of each forecast outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastMarginal {
    pub good: f64,
    pub bad: f64,
}

impl ForecastMarginal {
    pub fn probability(&self, observation: ForecastObservation) -> f64 {
        match observation {
            ForecastObservation::None => 1.0,
            ForecastObservation::Good => self.good,
            ForecastObservation::Bad => self.bad,
        }
    }
}

/// P(Good) and P(Bad) before the forecast is read.
///
/// Inputs are assumed validated.
pub fn forecast_marginal(prior: Prior, reliability: ForecastReliability) -> ForecastMarginal {
    let good = mix(
        prior.rain,
        reliability.p_good_given_rain,
        reliability.p_good_given_sunny,
    );
    let bad = mix(
        prior.rain,
        complement(reliability.p_good_given_rain),
        complement(reliability.p_good_given_sunny),
    );
    ForecastMarginal { good, bad }
}

/// Posterior P(Rain | observation).
///
/// Inputs are range-checked before any arithmetic. An observation that is
/// impossible under both weather states is a `DegenerateForecast` error.
pub fn update_belief(
    observation: ForecastObservation,
    prior_rain: f64,
    p_good_given_rain: f64,
    p_good_given_sunny: f64,
) -> Result<f64, EvaluationError> {
    let prior = Prior::new(prior_rain);
    let reliability = ForecastReliability::new(p_good_given_rain, p_good_given_sunny);
    prior.validate()?;
    reliability.validate()?;
    posterior_rain(observation, prior, reliability)
}

/// Bayes update on already-validated inputs.
pub(crate) fn posterior_rain(
    observation: ForecastObservation,
    prior: Prior,
    reliability: ForecastReliability,
) -> Result<f64, EvaluationError> {
    if !observation.is_observed() {
        return Ok(prior.rain);
    }

    let joint_rain = reliability.likelihood(observation, Weather::Rain) * prior.rain;
    let joint_sunny = reliability.likelihood(observation, Weather::Sunny) * prior.sunny();
    let evidence = joint_rain + joint_sunny;

    if evidence <= 0.0 {
        return Err(EvaluationError::DegenerateForecast { observation });
    }

    Ok(joint_rain / evidence)
}
