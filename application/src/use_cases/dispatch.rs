//! Generated tool handlers
//!
//! Every [`ToolDescriptor`] becomes one [`GeneratedTool`]. The handler owns
//! its own copy of the descriptor, so nothing it routes on can change after
//! registration, and shares only the invoker.

use crate::ports::api_invoker::{ApiInvokerPort, InvocationRequest};
use crate::ports::tool_host::ToolHandler;
use async_trait::async_trait;
use restbridge_domain::{
    ArgumentValidator, Arguments, DefaultArgumentValidator, InvocationResult, ToolDescriptor,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub struct GeneratedTool<I: ApiInvokerPort + 'static> {
    descriptor: ToolDescriptor,
    invoker: Arc<I>,
    validator: DefaultArgumentValidator,
}

impl<I: ApiInvokerPort + 'static> GeneratedTool<I> {
    pub fn new(descriptor: ToolDescriptor, invoker: Arc<I>) -> Self {
        Self {
            descriptor,
            invoker,
            validator: DefaultArgumentValidator,
        }
    }

    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Validated request for `arguments`, or the reason the call is rejected
    pub fn prepare(&self, mut arguments: Arguments) -> Result<InvocationRequest, String> {
        self.validator.validate(&self.descriptor, &arguments)?;

        for field in &self.descriptor.fields {
            arguments.entry(field.name.clone()).or_insert(Value::Null);
        }

        Ok(InvocationRequest {
            tool_name: self.descriptor.name.clone(),
            verb: self.descriptor.verb,
            path_template: self.descriptor.path_template.clone(),
            arguments,
        })
    }
}

#[async_trait]
impl<I: ApiInvokerPort + 'static> ToolHandler for GeneratedTool<I> {
    async fn call(&self, arguments: Arguments) -> InvocationResult {
        match self.prepare(arguments) {
            Ok(request) => self.invoker.execute(request).await,
            Err(reason) => {
                debug!(tool = %self.descriptor.name, "Rejected call: {}", reason);
                InvocationResult::invalid_call(&self.descriptor.name, reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restbridge_domain::{FieldLocation, FieldSpec, HttpVerb, InvocationStatus, TypeHint};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingInvoker {
        requests: Mutex<Vec<InvocationRequest>>,
    }

    #[async_trait]
    impl ApiInvokerPort for RecordingInvoker {
        async fn execute(&self, request: InvocationRequest) -> InvocationResult {
            let name = request.tool_name.clone();
            self.requests.lock().unwrap().push(request);
            InvocationResult::ok(name, json!({"ok": true}))
        }
    }

    fn update_tool(invoker: Arc<RecordingInvoker>) -> GeneratedTool<RecordingInvoker> {
        GeneratedTool::new(
            ToolDescriptor {
                name: "task_update".to_string(),
                verb: HttpVerb::Put,
                path_template: "/tasks/{pk}/".to_string(),
                description: "Update a task.".to_string(),
                fields: vec![
                    FieldSpec::new("pk", true, FieldLocation::Path, TypeHint::Integer),
                    FieldSpec::new("title", true, FieldLocation::Body, TypeHint::String),
                    FieldSpec::new("description", false, FieldLocation::Body, TypeHint::String),
                ],
            },
            invoker,
        )
    }

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_forwards_with_nulls_filled() {
        let invoker = Arc::new(RecordingInvoker::default());
        let tool = update_tool(Arc::clone(&invoker));

        let result = tool.call(args(json!({"pk": 7, "title": "x"}))).await;
        assert_eq!(result.status, InvocationStatus::Ok);

        let requests = invoker.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.tool_name, "task_update");
        assert_eq!(request.verb, HttpVerb::Put);
        assert_eq!(request.path_template, "/tasks/{pk}/");
        assert_eq!(
            Value::Object(request.arguments.clone()),
            json!({"pk": 7, "title": "x", "description": null})
        );
    }

    #[tokio::test]
    async fn test_missing_required_is_invalid_call() {
        let invoker = Arc::new(RecordingInvoker::default());
        let tool = update_tool(Arc::clone(&invoker));

        let result = tool.call(args(json!({"title": "x"}))).await;
        assert_eq!(result.status, InvocationStatus::InvalidCall);
        assert!(result.text().unwrap().contains("'pk'"));
        assert!(invoker.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_argument_is_invalid_call() {
        let invoker = Arc::new(RecordingInvoker::default());
        let tool = update_tool(Arc::clone(&invoker));

        let result = tool
            .call(args(json!({"pk": 1, "title": "x", "owner": "me"})))
            .await;
        assert_eq!(result.status, InvocationStatus::InvalidCall);
        assert!(invoker.requests.lock().unwrap().is_empty());
    }
}
