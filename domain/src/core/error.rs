//! Domain error types
//!
//! Two families live here:
//!
//! - [`BuildError`]: fatal to the build phase. Any of these aborts startup
//!   before the tool host accepts an invocation.
//! - [`FieldError`]: recoverable. The offending field is dropped and the
//!   build continues; callers log it as a warning.
//!
//! Invocation failures are not errors at this level: they are reported as
//! [`InvocationResult`](crate::tool::value_objects::InvocationResult) values.

use thiserror::Error;

/// Errors that abort the build phase
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Duplicate tool name '{name}' ({first} and {second})")]
    DuplicateToolName {
        name: String,
        first: String,
        second: String,
    },

    #[error("Unreadable route table: {0}")]
    UnreadableRouteTable(String),

    #[error("Unreadable serializer schema for '{resource}': {reason}")]
    UnreadableSchema { resource: String, reason: String },

    #[error("Path placeholder '{placeholder}' in {path} is not a valid parameter name")]
    InvalidPlaceholder { placeholder: String, path: String },

    #[error("Tool host rejected '{name}': {reason}")]
    Registration { name: String, reason: String },
}

/// Recoverable per-field problems found while classifying a route
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field '{field}' on {route} is not a valid identifier, dropped")]
    NotAnIdentifier { route: String, field: String },
}

impl FieldError {
    /// Name of the field that was dropped
    pub fn field(&self) -> &str {
        match self {
            FieldError::NotAnIdentifier { field, .. } => field,
        }
    }
}
