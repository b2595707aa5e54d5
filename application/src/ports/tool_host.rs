//! Tool host port
//!
//! The host is the agent-facing side: it accepts named tools with a parameter
//! list and dispatches incoming calls to their handlers.

use async_trait::async_trait;
use restbridge_domain::{Arguments, FieldSpec, InvocationResult};
use std::sync::Arc;
use thiserror::Error;

/// Errors a host may report at registration time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Tool '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("Tool '{name}' rejected: {reason}")]
    Rejected { name: String, reason: String },
}

/// Callable registered with a host
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Run one call. Never fails; problems are reported in the result.
    async fn call(&self, arguments: Arguments) -> InvocationResult;
}

/// Port for the tool-hosting runtime
pub trait ToolHostPort {
    fn register(
        &mut self,
        name: &str,
        description: &str,
        parameters: &[FieldSpec],
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), HostError>;
}
