//! Decision theory: expected utility, recommendation and value of information.

pub mod expected_utility;
pub mod voi;

pub use expected_utility::{
    best_decision, expected_utility, recommend, Decision, Recommendation, UtilityTable,
};
pub use voi::{compute_voi, ForecastBranch, VoiAnalysis};
