//! In-process tool host
//!
//! Holds every registered tool by name and dispatches calls to their
//! handlers. Registration happens once during the build phase; afterwards
//! the host is shared read-only (behind an `Arc`) by concurrent calls.

use indexmap::IndexMap;
use restbridge_application::{HostError, ToolHandler, ToolHostPort};
use restbridge_domain::core::string::is_identifier;
use restbridge_domain::{Arguments, FieldSpec, InvocationResult};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Description reported for a cancelled call
pub const CANCELLED: &str = "cancelled";

struct HostedTool {
    description: String,
    parameters: Vec<FieldSpec>,
    handler: Arc<dyn ToolHandler>,
}

/// Registered tool as seen by a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedToolInfo<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub parameters: &'a [FieldSpec],
}

#[derive(Default)]
pub struct LocalToolHost {
    tools: IndexMap<String, HostedTool>,
}

impl LocalToolHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Registered tools, in registration order
    pub fn tools(&self) -> impl Iterator<Item = HostedToolInfo<'_>> {
        self.tools.iter().map(|(name, tool)| HostedToolInfo {
            name,
            description: &tool.description,
            parameters: &tool.parameters,
        })
    }

    /// Dispatch one call by tool name
    pub async fn invoke(&self, name: &str, arguments: Arguments) -> InvocationResult {
        match self.tools.get(name) {
            Some(tool) => tool.handler.call(arguments).await,
            None => {
                debug!("Call to unknown tool '{}'", name);
                InvocationResult::invalid_call(name, format!("Unknown tool '{}'", name))
            }
        }
    }

    /// Dispatch one call, giving up as soon as `cancellation` fires.
    ///
    /// Dropping the call future aborts the outbound request.
    pub async fn invoke_with_cancellation(
        &self,
        name: &str,
        arguments: Arguments,
        cancellation: &CancellationToken,
    ) -> InvocationResult {
        if cancellation.is_cancelled() {
            return InvocationResult::transport_error(name, CANCELLED);
        }

        tokio::select! {
            biased;
            _ = cancellation.cancelled() => {
                debug!("Call to '{}' cancelled", name);
                InvocationResult::transport_error(name, CANCELLED)
            }
            result = self.invoke(name, arguments) => result,
        }
    }
}

impl ToolHostPort for LocalToolHost {
    fn register(
        &mut self,
        name: &str,
        description: &str,
        parameters: &[FieldSpec],
        handler: Arc<dyn ToolHandler>,
    ) -> Result<(), HostError> {
        if !is_identifier(name) {
            return Err(HostError::Rejected {
                name: name.to_string(),
                reason: "tool names must be identifiers".to_string(),
            });
        }
        if self.tools.contains_key(name) {
            return Err(HostError::AlreadyRegistered(name.to_string()));
        }

        self.tools.insert(
            name.to_string(),
            HostedTool {
                description: description.to_string(),
                parameters: parameters.to_vec(),
                handler,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use restbridge_domain::{FieldLocation, InvocationStatus, TypeHint};
    use serde_json::{Value, json};
    use std::time::Duration;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn call(&self, arguments: Arguments) -> InvocationResult {
            InvocationResult::ok("echo", Value::Object(arguments))
        }
    }

    struct Hang;

    #[async_trait]
    impl ToolHandler for Hang {
        async fn call(&self, _arguments: Arguments) -> InvocationResult {
            tokio::time::sleep(Duration::from_secs(30)).await;
            InvocationResult::empty("hang")
        }
    }

    fn params() -> Vec<FieldSpec> {
        vec![FieldSpec::new("pk", true, FieldLocation::Path, TypeHint::Integer)]
    }

    #[test]
    fn test_register_rejects_duplicates() {
        let mut host = LocalToolHost::new();
        host.register("echo", "Echo.", &params(), Arc::new(Echo)).unwrap();
        let err = host
            .register("echo", "Again.", &params(), Arc::new(Echo))
            .unwrap_err();
        assert_eq!(err, HostError::AlreadyRegistered("echo".to_string()));
        assert_eq!(host.len(), 1);
    }

    #[test]
    fn test_register_rejects_non_identifier() {
        let mut host = LocalToolHost::new();
        let err = host
            .register("task-list", "", &[], Arc::new(Echo))
            .unwrap_err();
        assert!(matches!(err, HostError::Rejected { .. }));
    }

    #[test]
    fn test_tools_listing() {
        let mut host = LocalToolHost::new();
        host.register("echo", "Echo.", &params(), Arc::new(Echo)).unwrap();
        let tools: Vec<HostedToolInfo<'_>> = host.tools().collect();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "echo");
        assert_eq!(tools[0].parameters[0].name, "pk");
    }

    #[tokio::test]
    async fn test_invoke_dispatches_by_name() {
        let mut host = LocalToolHost::new();
        host.register("echo", "Echo.", &params(), Arc::new(Echo)).unwrap();

        let arguments = json!({"pk": 1}).as_object().cloned().unwrap();
        let result = host.invoke("echo", arguments).await;
        assert_eq!(result.body(), Some(&json!({"pk": 1})));

        let unknown = host.invoke("missing", Arguments::new()).await;
        assert_eq!(unknown.status, InvocationStatus::InvalidCall);
    }

    #[tokio::test]
    async fn test_cancellation_aborts_call() {
        let mut host = LocalToolHost::new();
        host.register("hang", "Never returns.", &[], Arc::new(Hang)).unwrap();

        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let result = host
            .invoke_with_cancellation("hang", Arguments::new(), &token)
            .await;
        assert_eq!(result.status, InvocationStatus::TransportError);
        assert_eq!(result.text(), Some(CANCELLED));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_dispatches() {
        let mut host = LocalToolHost::new();
        host.register("echo", "Echo.", &[], Arc::new(Echo)).unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let result = host
            .invoke_with_cancellation("echo", Arguments::new(), &token)
            .await;
        assert_eq!(result.status, InvocationStatus::TransportError);
    }
}
