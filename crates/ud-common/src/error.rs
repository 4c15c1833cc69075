//! Error types for Umbrella Decision.
//!
//! Every error carries:
//! - a stable numeric code for machine parsing
//! - a category for grouping
//! - a recoverability hint and a suggested next step
//! - a remediation sentence for humans
//!
//! # Human-facing output
//!
//! ```text
//! ✗ Degenerate Forecast
//!   Reason: forecast observation 'good' has zero probability under both rain and sunny
//!   Fix: Give the observed forecast a non-zero likelihood under at least one weather state.
//! ```
//!
//! # Machine-facing output
//!
//! ```json
//! {
//!   "code": 30,
//!   "category": "inference",
//!   "message": "forecast observation 'good' has zero probability under both rain and sunny",
//!   "recoverable": true,
//!   "suggested_action": "fix_input",
//!   "context": { "observation": "good" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for Umbrella Decision operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Model file errors (parse, schema version, semantic validation).
    Config,
    /// Out-of-range evaluator inputs.
    Input,
    /// Bayes update failures.
    Inference,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Inference => write!(f, "inference"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Suggested next step for a caller that received an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Change the offending input value and evaluate again.
    FixInput,
    /// Run `config validate` on the model file.
    RunValidate,
    /// Fall back to the built-in model.
    ResetConfig,
    /// Retry the operation.
    Retry,
    /// Manual intervention required.
    ManualIntervention,
}

impl std::fmt::Display for SuggestedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestedAction::FixInput => write!(f, "fix_input"),
            SuggestedAction::RunValidate => write!(f, "run_validate"),
            SuggestedAction::ResetConfig => write!(f, "reset_config"),
            SuggestedAction::Retry => write!(f, "retry"),
            SuggestedAction::ManualIntervention => write!(f, "manual_intervention"),
        }
    }
}

/// Unified error type for Umbrella Decision.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid model file: {0}")]
    InvalidModel(String),

    #[error("schema version mismatch: expected {expected}, got {actual}")]
    SchemaVersion { expected: String, actual: String },

    // Input errors (20-29)
    #[error("{field} must be {expected} (got {value})")]
    InvalidProbability {
        field: String,
        value: f64,
        expected: &'static str,
    },

    #[error("utility {field} must be in [0, 100] (got {value})")]
    InvalidUtility { field: String, value: f64 },

    // Inference errors (30-39)
    #[error("forecast observation '{observation}' has zero probability under both rain and sunny")]
    DegenerateForecast { observation: String },

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Input errors
    /// - 30-39: Inference errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidModel(_) => 11,
            Error::SchemaVersion { .. } => 12,
            Error::InvalidProbability { .. } => 20,
            Error::InvalidUtility { .. } => 21,
            Error::DegenerateForecast { .. } => 30,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidModel(_) | Error::SchemaVersion { .. } => {
                ErrorCategory::Config
            }
            Error::InvalidProbability { .. } | Error::InvalidUtility { .. } => {
                ErrorCategory::Input
            }
            Error::DegenerateForecast { .. } => ErrorCategory::Inference,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Whether a caller can fix the problem without a code change.
    ///
    /// Evaluation is deterministic, so retrying the same inputs never helps;
    /// only changed inputs or a changed model file do.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Json(_))
    }

    pub fn suggested_action(&self) -> SuggestedAction {
        match self {
            Error::Config(_) => SuggestedAction::RunValidate,
            Error::InvalidModel(_) => SuggestedAction::RunValidate,
            Error::SchemaVersion { .. } => SuggestedAction::ResetConfig,
            Error::InvalidProbability { .. } => SuggestedAction::FixInput,
            Error::InvalidUtility { .. } => SuggestedAction::FixInput,
            Error::DegenerateForecast { .. } => SuggestedAction::FixInput,
            Error::Io(_) => SuggestedAction::Retry,
            Error::Json(_) => SuggestedAction::ManualIntervention,
        }
    }

    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Run 'ud-core config validate' and check the model file syntax.",
            Error::InvalidModel(_) => {
                "Run 'ud-core config validate <path>' to see which field is out of range."
            }
            Error::SchemaVersion { .. } => {
                "Update the model file's schema_version, or remove the file to use built-in defaults."
            }
            Error::InvalidProbability { .. } => {
                "Likelihoods must lie in [0, 1] and the prior strictly between 0 and 1."
            }
            Error::InvalidUtility { .. } => "Utilities must lie in [0, 100].",
            Error::DegenerateForecast { .. } => {
                "Give the observed forecast a non-zero likelihood under at least one weather state."
            }
            Error::Io(_) => "Check that the file exists and is readable, then retry.",
            Error::Json(_) => "Internal serialization failure. Please report it as a bug.",
        }
    }

    /// Short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidModel(_) => "Invalid Model File",
            Error::SchemaVersion { .. } => "Schema Version Mismatch",
            Error::InvalidProbability { .. } => "Invalid Probability",
            Error::InvalidUtility { .. } => "Invalid Utility",
            Error::DegenerateForecast { .. } => "Degenerate Forecast",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub recoverable: bool,
    pub suggested_action: SuggestedAction,
    /// Additional context (offending field, value, observation).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::InvalidProbability { field, value, .. }
            | Error::InvalidUtility { field, value } => {
                context.insert("field".to_string(), serde_json::json!(field));
                context.insert("value".to_string(), serde_json::json!(value));
            }
            Error::DegenerateForecast { observation } => {
                context.insert("observation".to_string(), serde_json::json!(observation));
            }
            Error::SchemaVersion { expected, actual } => {
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("actual".to_string(), serde_json::json!(actual));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
            context,
        }
    }
}

impl StructuredError {
    pub fn with_context(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.context.insert(key.into(), v);
        }
        self
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}
