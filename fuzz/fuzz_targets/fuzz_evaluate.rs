//! Fuzz target for the evaluator.
//!
//! Any combination of floats (NaN and infinities included) must produce a
//! recommendation or a typed error, and an accepted input must yield
//! finite probabilities.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use ud_core::decision::{compute_voi, UtilityTable};
use ud_core::evaluate::{evaluate, EvaluationInput};
use ud_core::inference::{ForecastObservation, ForecastReliability, Prior};

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    observation: u8,
    prior_rain: f64,
    p_good_given_rain: f64,
    p_good_given_sunny: f64,
    utilities: [f64; 4],
}

fuzz_target!(|input: FuzzInput| {
    let observation = match input.observation % 3 {
        0 => ForecastObservation::None,
        1 => ForecastObservation::Good,
        _ => ForecastObservation::Bad,
    };
    let [rain_umbrella, rain_no_umbrella, sunny_umbrella, sunny_no_umbrella] = input.utilities;
    let eval_input = EvaluationInput {
        observation,
        prior: Prior::new(input.prior_rain),
        reliability: ForecastReliability::new(input.p_good_given_rain, input.p_good_given_sunny),
        utilities: UtilityTable {
            rain_umbrella,
            rain_no_umbrella,
            sunny_umbrella,
            sunny_no_umbrella,
        },
    };

    if let Ok(result) = evaluate(&eval_input) {
        assert!((0.0..=1.0).contains(&result.posterior_rain));
        assert!(result.eu_umbrella.is_finite());
        assert!(result.eu_no_umbrella.is_finite());
    }

    if let Ok(analysis) = compute_voi(
        eval_input.prior,
        eval_input.reliability,
        &eval_input.utilities,
    ) {
        assert!(analysis.voi.is_finite());
    }
});
