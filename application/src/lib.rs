//! Application layer for restbridge
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    api_invoker::{ApiInvokerPort, InvocationRequest},
    documentation::{DocumentationError, DocumentationSinkPort},
    tool_host::{HostError, ToolHandler, ToolHostPort},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::build_registry::{
    BuildRegistryInput, BuildRegistryOutput, BuildRegistryUseCase,
};
pub use use_cases::dispatch::GeneratedTool;
pub use use_cases::emit_docs::EmitDocumentationUseCase;
