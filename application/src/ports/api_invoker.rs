//! API invoker port
//!
//! Defines the interface for sending one tool call to the backing API.

use async_trait::async_trait;
use restbridge_domain::{Arguments, HttpVerb, InvocationResult};

/// One call forwarded by a generated tool
#[derive(Debug, Clone, PartialEq)]
pub struct InvocationRequest {
    pub tool_name: String,
    pub verb: HttpVerb,
    pub path_template: String,
    /// Full argument bag; absent optional parameters are present as `null`
    pub arguments: Arguments,
}

/// Port for outbound API calls
///
/// Implementations never fail: transport problems, auth rejections and HTTP
/// errors all come back as an [`InvocationResult`].
#[async_trait]
pub trait ApiInvokerPort: Send + Sync {
    async fn execute(&self, request: InvocationRequest) -> InvocationResult;
}
