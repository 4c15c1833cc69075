//! Value of information of the forecast.
//!
//! Compares deciding on the prior alone with reading the forecast first
//! and then deciding:
//!
//! ```text
//! VOI = Σ_f P(f) · max_d EU(d | f)  −  max_d EU(d)
//! ```
//!
//! The sum runs over forecast outcomes with P(f) > 0. An outcome that can
//! never occur has an undefined posterior but contributes nothing, so it
//! is skipped rather than reported as degenerate.
//!
//! VOI is never negative: knowing more before acting can only help an
//! expected-utility maximiser.

use crate::decision::expected_utility::{best_decision, Recommendation, UtilityTable};
use crate::evaluate::EvaluationError;
use crate::inference::belief::posterior_rain;
use crate::inference::{forecast_marginal, ForecastObservation, ForecastReliability, Prior};
use crate::logging::event_names;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What happens after one possible forecast outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForecastBranch {
    pub observation: ForecastObservation,
    /// P(observation) before the forecast is read.
    pub probability: f64,
    /// P(Rain | observation).
    pub posterior_rain: f64,
    pub recommendation: Recommendation,
    /// EU of the recommended decision under this branch.
    pub best_eu: f64,
}

/// Complete value-of-information analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VoiAnalysis {
    /// Decision on the prior alone.
    pub prior_recommendation: Recommendation,
    /// EU of that decision.
    pub prior_best_eu: f64,
    /// Forecast outcomes with non-zero probability.
    pub branches: Vec<ForecastBranch>,
    /// Σ P(f) · best EU given f.
    pub expected_eu_with_forecast: f64,
    /// `expected_eu_with_forecast - prior_best_eu`.
    pub voi: f64,
    /// Whether some forecast outcome flips the prior decision.
    pub forecast_can_change_decision: bool,
}

/// Value of consulting the forecast before deciding.
pub fn compute_voi(
    prior: Prior,
    reliability: ForecastReliability,
    utilities: &UtilityTable,
) -> Result<VoiAnalysis, EvaluationError> {
    prior.validate()?;
    reliability.validate()?;
    utilities.validate()?;

    let (prior_recommendation, prior_best_eu) = best_decision(prior.rain, utilities);
    let uninformative = reliability.is_uninformative();
    let marginal = forecast_marginal(prior, reliability);

    let mut branches = Vec::with_capacity(ForecastObservation::OUTCOMES.len());
    for observation in ForecastObservation::OUTCOMES {
        let probability = marginal.probability(observation);
        if probability <= 0.0 {
            continue;
        }
        // Equal likelihoods leave the belief at the prior.
        let posterior = if uninformative {
            prior.rain
        } else {
            posterior_rain(observation, prior, reliability)?
        };
        let (recommendation, best_eu) = best_decision(posterior, utilities);
        branches.push(ForecastBranch {
            observation,
            probability,
            posterior_rain: posterior,
            recommendation,
            best_eu,
        });
    }

    let (expected_eu_with_forecast, voi) = if uninformative {
        (prior_best_eu, 0.0)
    } else {
        let expected: f64 = branches.iter().map(|b| b.probability * b.best_eu).sum();
        (expected, expected - prior_best_eu)
    };
    let forecast_can_change_decision = branches
        .iter()
        .any(|b| b.recommendation != prior_recommendation);

    tracing::debug!(
        target: event_names::DECIDE_VOI,
        prior_best_eu,
        expected_eu_with_forecast,
        voi,
        "value of information computed"
    );

    Ok(VoiAnalysis {
        prior_recommendation,
        prior_best_eu,
        branches,
        expected_eu_with_forecast,
        voi,
        forecast_can_change_decision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn classic_voi() {
        let analysis = compute_voi(
            Prior::default(),
            ForecastReliability::default(),
            &UtilityTable::default(),
        )
        .unwrap();

        assert_eq!(analysis.prior_recommendation, Recommendation::LeaveUmbrella);
        assert!(approx_eq(analysis.prior_best_eu, 70.0, 1e-9));
        assert_eq!(analysis.branches.len(), 2);

        // Good: P = 0.38, posterior 0.24/0.38, take: EU = (0.24·70 + 0.14·20)/0.38
        let good = &analysis.branches[0];
        assert_eq!(good.observation, ForecastObservation::Good);
        assert!(approx_eq(good.probability, 0.38, 1e-12));
        assert_eq!(good.recommendation, Recommendation::TakeUmbrella);
        assert!(approx_eq(good.best_eu, (16.8 + 2.8) / 0.38, 1e-9));

        // Bad: P = 0.62, posterior 0.06/0.62, leave: EU = 0.56·100/0.62
        let bad = &analysis.branches[1];
        assert_eq!(bad.recommendation, Recommendation::LeaveUmbrella);
        assert!(approx_eq(bad.best_eu, 56.0 / 0.62, 1e-9));

        // 19.6 + 56 = 75.6
        assert!(approx_eq(analysis.expected_eu_with_forecast, 75.6, 1e-9));
        assert!(approx_eq(analysis.voi, 5.6, 1e-9));
        assert!(analysis.forecast_can_change_decision);
    }

    #[test]
    fn uninformative_forecast_has_zero_voi() {
        let analysis = compute_voi(
            Prior::default(),
            ForecastReliability::new(0.5, 0.5),
            &UtilityTable::default(),
        )
        .unwrap();
        assert!(approx_eq(analysis.voi, 0.0, 1e-9));
        assert!(!analysis.forecast_can_change_decision);
    }

    #[test]
    fn uninformative_forecast_keeps_the_prior_exactly() {
        let utilities = UtilityTable {
            rain_umbrella: 73.1,
            rain_no_umbrella: 3.7,
            sunny_umbrella: 19.3,
            sunny_no_umbrella: 97.9,
        };
        let reliability = ForecastReliability::new(0.37, 0.37);
        assert!(reliability.is_uninformative());

        let analysis = compute_voi(Prior::new(0.41), reliability, &utilities).unwrap();
        assert_eq!(analysis.voi, 0.0);
        assert_eq!(analysis.expected_eu_with_forecast, analysis.prior_best_eu);
        for branch in &analysis.branches {
            assert_eq!(branch.posterior_rain, 0.41);
            assert_eq!(branch.recommendation, analysis.prior_recommendation);
        }
        assert!(!ForecastReliability::default().is_uninformative());
    }

    #[test]
    fn zero_probability_branch_skipped() {
        // The forecast always says Good, so Bad never happens.
        let analysis = compute_voi(
            Prior::default(),
            ForecastReliability::new(1.0, 1.0),
            &UtilityTable::default(),
        )
        .unwrap();
        assert_eq!(analysis.branches.len(), 1);
        assert_eq!(analysis.branches[0].observation, ForecastObservation::Good);
        assert!(approx_eq(analysis.voi, 0.0, 1e-9));
    }

    #[test]
    fn perfect_forecast_gets_full_information() {
        let analysis = compute_voi(
            Prior::default(),
            ForecastReliability::new(1.0, 0.0),
            &UtilityTable::default(),
        )
        .unwrap();
        // Rain → umbrella (70), sunny → no umbrella (100): 0.3·70 + 0.7·100 = 91
        assert!(approx_eq(analysis.expected_eu_with_forecast, 91.0, 1e-9));
        assert!(approx_eq(analysis.voi, 21.0, 1e-9));
    }

    #[test]
    fn invalid_inputs_rejected() {
        assert!(compute_voi(
            Prior::new(1.0),
            ForecastReliability::default(),
            &UtilityTable::default()
        )
        .is_err());

        let table = UtilityTable {
            rain_umbrella: -1.0,
            ..UtilityTable::default()
        };
        assert!(matches!(
            compute_voi(Prior::default(), ForecastReliability::default(), &table),
            Err(EvaluationError::InvalidUtility { .. })
        ));
    }
}
