//! Umbrella Decision common types, IDs, and errors.
//!
//! This crate provides the types shared across the workspace:
//! - Evaluation identifiers for correlating output and logs
//! - The structured error taxonomy with stable codes
//! - Output format selection
//! - The output schema version

pub mod error;
pub mod id;
pub mod output;

pub use error::{Error, ErrorCategory, Result, StructuredError, SuggestedAction};
pub use id::EvaluationId;
pub use output::OutputFormat;

/// Schema version stamped on every JSON payload.
pub const SCHEMA_VERSION: &str = "1.0.0";
