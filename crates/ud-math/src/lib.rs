//! Umbrella Decision math utilities.

pub mod math;

pub use math::bayes_factor;
pub use math::probability::*;
