//! Model validation errors and semantic validation.
//!
//! Out-of-range values are rejected, never clamped. The same bounds apply
//! to values given on the command line.

use thiserror::Error;
use ud_math::{is_open_unit_interval, is_unit_interval};

use crate::model::Model;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Lower bound of the utility scale.
pub const UTILITY_MIN: f64 = 0.0;
/// Upper bound of the utility scale.
pub const UTILITY_MAX: f64 = 100.0;

/// Model validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a model, stopping at the first problem.
pub fn validate_model(model: &Model) -> ValidationResult<()> {
    match model_issues(model).into_iter().next() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Every problem with a model, in field order.
///
/// A schema version mismatch is reported alone: field bounds of an
/// unknown version are meaningless.
pub fn model_issues(model: &Model) -> Vec<ValidationError> {
    if model.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return vec![ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: model.schema_version.clone(),
        }];
    }

    let mut issues = Vec::new();

    if let Err(e) = check_prior("prior_rain", model.prior_rain) {
        issues.push(e);
    }
    for (field, value) in [
        ("forecast.p_good_given_rain", model.forecast.p_good_given_rain),
        ("forecast.p_good_given_sunny", model.forecast.p_good_given_sunny),
    ] {
        if let Err(e) = check_likelihood(field, value) {
            issues.push(e);
        }
    }
    for (name, value) in model.utilities.entries() {
        if let Err(e) = check_utility(&format!("utilities.{}", name), value) {
            issues.push(e);
        }
    }

    issues
}

/// A prior must lie strictly inside (0, 1).
pub fn check_prior(field: &str, value: f64) -> ValidationResult<()> {
    if !is_open_unit_interval(value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in (0, 1), got {}", value),
        });
    }
    Ok(())
}

/// A likelihood must lie in [0, 1].
pub fn check_likelihood(field: &str, value: f64) -> ValidationResult<()> {
    if !is_unit_interval(value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [0, 1], got {}", value),
        });
    }
    Ok(())
}

/// A utility must be finite and lie in [0, 100].
pub fn check_utility(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() || !(UTILITY_MIN..=UTILITY_MAX).contains(&value) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("Must be in [0, 100], got {}", value),
        });
    }
    Ok(())
}
