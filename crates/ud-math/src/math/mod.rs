//! Core math modules.

pub mod bayes_factor;
pub mod probability;
