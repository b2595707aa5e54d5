//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod api_invoker;
pub mod documentation;
pub mod tool_host;
pub mod tool_schema;
