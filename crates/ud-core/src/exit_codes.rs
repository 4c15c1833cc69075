//! Exit codes for the ud-core CLI.
//!
//! The exit code alone tells a script what to do:
//! - 0-1: success, and which way the decision went
//! - 10-19: user errors (bad arguments, inputs or model file)
//! - 20-29: internal and I/O errors

/// Exit codes for ud-core operations.
///
/// A stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Leave the umbrella; also any non-evaluating command that succeeded.
    OkLeave = 0,

    /// Take the umbrella.
    OkTake = 1,

    /// Invalid arguments.
    ArgsError = 10,

    /// Probability or utility out of range.
    InputError = 11,

    /// Observed forecast impossible under both weather states.
    DegenerateError = 12,

    /// Model file missing, unparsable or invalid.
    ConfigError = 13,

    /// Model file schema version mismatch.
    VersionError = 14,

    /// Internal error (bug - please report).
    InternalError = 20,

    /// I/O error.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Codes 0-1.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::OkLeave | ExitCode::OkTake)
    }

    /// Codes 10-19.
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&self.as_i32())
    }

    /// Codes 20-29.
    pub fn is_internal_error(self) -> bool {
        self.as_i32() >= 20
    }

    /// Name used in JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::OkLeave => "OK_LEAVE",
            ExitCode::OkTake => "OK_TAKE",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::DegenerateError => "ERR_DEGENERATE",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::VersionError => "ERR_VERSION",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }

    /// Exit code for a failed command.
    pub fn from_error(err: &ud_common::Error) -> Self {
        use ud_common::Error;
        match err {
            Error::Config(_) | Error::InvalidModel(_) => ExitCode::ConfigError,
            Error::SchemaVersion { .. } => ExitCode::VersionError,
            Error::InvalidProbability { .. } | Error::InvalidUtility { .. } => {
                ExitCode::InputError
            }
            Error::DegenerateForecast { .. } => ExitCode::DegenerateError,
            Error::Io(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }

    /// Exit code for a successful evaluation.
    pub fn from_recommendation(recommendation: crate::decision::Recommendation) -> Self {
        match recommendation {
            crate::decision::Recommendation::TakeUmbrella => ExitCode::OkTake,
            crate::decision::Recommendation::LeaveUmbrella => ExitCode::OkLeave,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}
