//! Tool domain value objects: the outcome of one invocation
//!
//! Every call through a generated tool produces an [`InvocationResult`],
//! whatever happened on the wire. Failures are values here, never errors:
//!
//! | Status | When |
//! |--------|------|
//! | `ok` | 2xx with a JSON body |
//! | `empty` | 204 No Content |
//! | `auth_error` | 401 / 403 (response text is never echoed) |
//! | `http_error` | any other status, or a 2xx body that is not JSON |
//! | `transport_error` | connect failure, timeout, cancellation |
//! | `invalid_call` | rejected before any request was sent |

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed message for 401/403 responses
pub const AUTH_ERROR_MESSAGE: &str = "invalid or expired credential";

/// Fixed message for 204 responses
pub const EMPTY_MESSAGE: &str = "operation completed, no content";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    Ok,
    Empty,
    AuthError,
    HttpError,
    TransportError,
    InvalidCall,
}

impl InvocationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvocationStatus::Ok => "ok",
            InvocationStatus::Empty => "empty",
            InvocationStatus::AuthError => "auth_error",
            InvocationStatus::HttpError => "http_error",
            InvocationStatus::TransportError => "transport_error",
            InvocationStatus::InvalidCall => "invalid_call",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationStatus::Ok | InvocationStatus::Empty)
    }
}

impl std::fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body of a result: parsed JSON or a plain message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InvocationPayload {
    Text(String),
    Structured(Value),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Absent when no response was received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
}

/// Outcome of one tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub tool_name: String,
    pub status: InvocationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<InvocationPayload>,
    #[serde(default)]
    pub metadata: InvocationMetadata,
}

impl InvocationResult {
    fn new(
        tool_name: impl Into<String>,
        status: InvocationStatus,
        payload: Option<InvocationPayload>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            status,
            payload,
            metadata: InvocationMetadata::default(),
        }
    }

    pub fn ok(tool_name: impl Into<String>, body: Value) -> Self {
        Self::new(
            tool_name,
            InvocationStatus::Ok,
            Some(InvocationPayload::Structured(body)),
        )
    }

    pub fn empty(tool_name: impl Into<String>) -> Self {
        Self::new(
            tool_name,
            InvocationStatus::Empty,
            Some(InvocationPayload::Text(EMPTY_MESSAGE.to_string())),
        )
    }

    pub fn auth_error(tool_name: impl Into<String>) -> Self {
        Self::new(
            tool_name,
            InvocationStatus::AuthError,
            Some(InvocationPayload::Text(AUTH_ERROR_MESSAGE.to_string())),
        )
    }

    pub fn http_error(tool_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            tool_name,
            InvocationStatus::HttpError,
            Some(InvocationPayload::Text(text.into())),
        )
    }

    pub fn transport_error(tool_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(
            tool_name,
            InvocationStatus::TransportError,
            Some(InvocationPayload::Text(description.into())),
        )
    }

    pub fn invalid_call(tool_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            tool_name,
            InvocationStatus::InvalidCall,
            Some(InvocationPayload::Text(reason.into())),
        )
    }

    pub fn with_http_status(mut self, status: u16) -> Self {
        self.metadata.http_status = Some(status);
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Payload text, if the payload is a plain message
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Some(InvocationPayload::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Payload value, if the payload is structured
    pub fn body(&self) -> Option<&Value> {
        match &self.payload {
            Some(InvocationPayload::Structured(value)) => Some(value),
            _ => None,
        }
    }

    /// Text handed back to the agent
    pub fn render(&self) -> String {
        let detail = match &self.payload {
            Some(InvocationPayload::Structured(value)) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            Some(InvocationPayload::Text(text)) => text.clone(),
            None => String::new(),
        };

        match self.status {
            InvocationStatus::Ok => detail,
            InvocationStatus::Empty => format!("Success: {} ({})", self.tool_name, detail),
            InvocationStatus::AuthError => format!("Authentication error: {}", detail),
            InvocationStatus::HttpError => match self.metadata.http_status {
                Some(status) => format!(
                    "Error in tool {}: {} (status {})",
                    self.tool_name, detail, status
                ),
                None => format!("Error in tool {}: {}", self.tool_name, detail),
            },
            InvocationStatus::TransportError => {
                format!("Error executing {}: {}", self.tool_name, detail)
            }
            InvocationStatus::InvalidCall => {
                format!("Invalid call to {}: {}", self.tool_name, detail)
            }
        }
    }
}
