//! The decision evaluator: one call from inputs to recommendation.
//!
//! Every input is range-checked before any arithmetic, so an error never
//! comes with a partial result.

use crate::decision::{expected_utility, recommend, Decision, Recommendation, UtilityTable};
use crate::inference::belief::posterior_rain;
use crate::inference::{ForecastObservation, ForecastReliability, Prior, Weather};
use crate::logging::event_names;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use ud_math::bayes_factor::{EvidenceDirection, EvidenceSummary};
use ud_math::complement;

/// Errors raised by the evaluator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("{field} must be {expected} (got {value})")]
    InvalidProbability {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("forecast observation '{observation}' has zero probability under both rain and sunny")]
    DegenerateForecast { observation: ForecastObservation },

    #[error("utility for {weather}/{decision} must be in [0, 100] (got {value})")]
    InvalidUtility {
        weather: Weather,
        decision: Decision,
        value: f64,
    },
}

impl From<EvaluationError> for ud_common::Error {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::InvalidProbability {
                field,
                value,
                expected,
            } => ud_common::Error::InvalidProbability {
                field: field.to_string(),
                value,
                expected,
            },
            EvaluationError::DegenerateForecast { observation } => {
                ud_common::Error::DegenerateForecast {
                    observation: observation.to_string(),
                }
            }
            EvaluationError::InvalidUtility {
                weather,
                decision,
                value,
            } => ud_common::Error::InvalidUtility {
                field: format!("{}_{}", weather, decision),
                value,
            },
        }
    }
}

/// Everything the evaluator needs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct EvaluationInput {
    pub observation: ForecastObservation,
    pub prior: Prior,
    pub reliability: ForecastReliability,
    pub utilities: UtilityTable,
}

impl EvaluationInput {
    /// Build an input from a loaded model file.
    pub fn from_model(model: &ud_config::Model, observation: ForecastObservation) -> Self {
        EvaluationInput {
            observation,
            prior: Prior::new(model.prior_rain),
            reliability: ForecastReliability::new(
                model.forecast.p_good_given_rain,
                model.forecast.p_good_given_sunny,
            ),
            utilities: UtilityTable::from(&model.utilities),
        }
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        self.prior.validate()?;
        self.reliability.validate()?;
        self.utilities.validate()
    }
}

/// Which weather state an observed forecast points towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceLean {
    SupportsRain,
    SupportsSunny,
    Neutral,
}

impl EvidenceLean {
    pub fn phrase(&self) -> &'static str {
        match self {
            EvidenceLean::SupportsRain => "supports rain",
            EvidenceLean::SupportsSunny => "supports sunny",
            EvidenceLean::Neutral => "neutral",
        }
    }
}

/// An evidence measure that is infinite when one likelihood is zero.
///
/// JSON has no infinity, so the unbounded case is the string `"inf"` or
/// `"-inf"` rather than a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum EvidenceValue {
    Finite(f64),
    Unbounded(Infinity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Infinity {
    #[serde(rename = "inf")]
    Positive,
    #[serde(rename = "-inf")]
    Negative,
}

impl EvidenceValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            EvidenceValue::Finite(v) => *v,
            EvidenceValue::Unbounded(Infinity::Positive) => f64::INFINITY,
            EvidenceValue::Unbounded(Infinity::Negative) => f64::NEG_INFINITY,
        }
    }
}

impl From<f64> for EvidenceValue {
    fn from(value: f64) -> Self {
        if value == f64::INFINITY {
            EvidenceValue::Unbounded(Infinity::Positive)
        } else if value == f64::NEG_INFINITY {
            EvidenceValue::Unbounded(Infinity::Negative)
        } else {
            EvidenceValue::Finite(value)
        }
    }
}

impl fmt::Display for EvidenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceValue::Finite(v) => fmt::Display::fmt(v, f),
            EvidenceValue::Unbounded(Infinity::Positive) => f.write_str("inf"),
            EvidenceValue::Unbounded(Infinity::Negative) => f.write_str("-inf"),
        }
    }
}

/// How strongly the observed forecast moved the belief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastEvidence {
    /// P(obs|Rain) / P(obs|Sunny).
    pub likelihood_ratio: EvidenceValue,
    /// Natural log of the ratio.
    pub log_bayes_factor: EvidenceValue,
    /// The same evidence in bits.
    pub bits: EvidenceValue,
    /// Jeffreys-scale label.
    pub strength: String,
    pub lean: EvidenceLean,
}

impl From<EvidenceSummary> for ForecastEvidence {
    fn from(summary: EvidenceSummary) -> Self {
        let lean = match summary.direction {
            EvidenceDirection::FavorsH1 => EvidenceLean::SupportsRain,
            EvidenceDirection::FavorsH0 => EvidenceLean::SupportsSunny,
            EvidenceDirection::Neutral => EvidenceLean::Neutral,
        };
        ForecastEvidence {
            likelihood_ratio: summary.bayes_factor.into(),
            log_bayes_factor: summary.log_bf.into(),
            bits: summary.delta_bits.into(),
            strength: summary.strength.label().to_string(),
            lean,
        }
    }
}

/// One row of the prior-versus-posterior weather table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BeliefRow {
    pub weather: Weather,
    pub prior: f64,
    pub posterior: f64,
}

/// Evaluator output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Evaluation {
    pub observation: ForecastObservation,
    pub prior_rain: f64,
    pub posterior_rain: f64,
    pub posterior_sunny: f64,
    pub eu_umbrella: f64,
    pub eu_no_umbrella: f64,
    pub recommendation: Recommendation,
    /// Present only when a forecast was observed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<ForecastEvidence>,
}

impl Evaluation {
    /// P(weather) and P(weather | forecast) for both weather states.
    pub fn belief_table(&self) -> [BeliefRow; 2] {
        [
            BeliefRow {
                weather: Weather::Rain,
                prior: self.prior_rain,
                posterior: self.posterior_rain,
            },
            BeliefRow {
                weather: Weather::Sunny,
                prior: complement(self.prior_rain),
                posterior: self.posterior_sunny,
            },
        ]
    }

    pub fn expected_utility(&self, decision: Decision) -> f64 {
        match decision {
            Decision::Umbrella => self.eu_umbrella,
            Decision::NoUmbrella => self.eu_no_umbrella,
        }
    }
}

/// Update the belief, score both decisions and recommend one.
pub fn evaluate(input: &EvaluationInput) -> Result<Evaluation, EvaluationError> {
    input.validate()?;

    let posterior = posterior_rain(input.observation, input.prior, input.reliability)?;
    tracing::debug!(
        target: event_names::INFER_POSTERIOR,
        observation = %input.observation,
        prior_rain = input.prior.rain,
        posterior_rain = posterior,
        "belief updated"
    );

    let eu_umbrella = expected_utility(posterior, &input.utilities, Decision::Umbrella);
    let eu_no_umbrella = expected_utility(posterior, &input.utilities, Decision::NoUmbrella);
    let recommendation = recommend(eu_umbrella, eu_no_umbrella);
    tracing::debug!(
        target: event_names::DECIDE_RECOMMENDED,
        eu_umbrella,
        eu_no_umbrella,
        recommendation = %recommendation,
        "decision scored"
    );

    let evidence = if input.observation.is_observed() {
        EvidenceSummary::from_likelihoods(
            input
                .reliability
                .likelihood(input.observation, Weather::Rain),
            input
                .reliability
                .likelihood(input.observation, Weather::Sunny),
        )
        .map(ForecastEvidence::from)
    } else {
        None
    };

    Ok(Evaluation {
        observation: input.observation,
        prior_rain: input.prior.rain,
        posterior_rain: posterior,
        posterior_sunny: complement(posterior),
        eu_umbrella,
        eu_no_umbrella,
        recommendation,
        evidence,
    })
}
