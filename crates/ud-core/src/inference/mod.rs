//! Belief updating over the weather variable.

pub mod belief;

pub use belief::{
    forecast_marginal, update_belief, ForecastMarginal, ForecastObservation, ForecastReliability,
    Prior, Weather,
};
