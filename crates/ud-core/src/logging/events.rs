//! Structured event definitions for logging.
//!
//! Every event carries the run ID, the evaluation ID when one exists, and
//! the stage that emitted it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Level::Trace,
            tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// Steps of one CLI invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Startup and argument handling.
    Init,
    /// Model resolution and validation.
    Config,
    /// Belief update.
    Infer,
    /// Expected utility and recommendation.
    Decide,
    /// Writing the payload.
    Render,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Init => "init",
            Stage::Config => "config",
            Stage::Infer => "infer",
            Stage::Decide => "decide",
            Stage::Render => "render",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable event names. Used as the tracing target.
pub mod event_names {
    pub const RUN_STARTED: &str = "run.started";
    pub const RUN_FINISHED: &str = "run.finished";

    pub const CONFIG_LOADED: &str = "config.loaded";
    pub const CONFIG_DEFAULT_USED: &str = "config.default_used";
    pub const CONFIG_ERROR: &str = "config.error";

    pub const INFER_POSTERIOR: &str = "infer.posterior";

    pub const DECIDE_RECOMMENDED: &str = "decide.recommended";
    pub const DECIDE_VOI: &str = "decide.voi";
    pub const DECIDE_FAILED: &str = "decide.failed";

    pub const RENDER_WRITTEN: &str = "render.written";

    pub const INTERNAL_ERROR: &str = "internal_error";
}

/// Correlation IDs shared by all events of one invocation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub run_id: String,
    /// Set once an evaluation ID has been minted.
    pub evaluation_id: Option<String>,
}

impl LogContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        LogContext {
            run_id: run_id.into(),
            evaluation_id: None,
        }
    }

    pub fn with_evaluation_id(mut self, evaluation_id: impl Into<String>) -> Self {
        self.evaluation_id = Some(evaluation_id.into());
        self
    }

    /// Evaluation ID for log fields, "-" when there is none.
    pub fn evaluation_label(&self) -> &str {
        self.evaluation_id.as_deref().unwrap_or("-")
    }
}
