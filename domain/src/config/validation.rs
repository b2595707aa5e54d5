//! Configuration issues reported by config validation.
//!
//! Validation never fails hard: it returns every detected issue with a
//! severity, and the caller decides whether to abort (any [`Severity::Error`])
//! or just log (warnings).

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A required value is empty (e.g. `api.base_url`).
    MissingValue { field: String },
    /// A string value could not be parsed into its enum.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric value is outside its accepted range (e.g. a zero timeout).
    OutOfRange { field: String, value: String },
    /// Both `routes.table` and `routes.url` are set; the file wins.
    ConflictingSources,
    /// Neither `routes.table` nor `routes.url` is set.
    NoRouteSource,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
