//! Umbrella Decision Core Library
//!
//! This library provides:
//! - Bayesian belief update of the weather given a forecast
//! - Expected utility, the recommendation and value of information
//! - The decision network description
//! - Model loading, logging, exit codes and JSON Schema export
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod decision;
pub mod evaluate;
pub mod exit_codes;
pub mod inference;
pub mod logging;
pub mod network;
pub mod output;
pub mod schema;

pub use decision::{
    best_decision, compute_voi, expected_utility, recommend, Decision, Recommendation,
    UtilityTable, VoiAnalysis,
};
pub use evaluate::{evaluate, Evaluation, EvaluationError, EvaluationInput};
pub use inference::{update_belief, ForecastObservation, ForecastReliability, Prior, Weather};
pub use network::DecisionNetwork;
