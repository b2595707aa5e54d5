//! Tool schema conversion port.
//!
//! The domain decides which tools exist and what they accept
//! ([`ToolDescriptor`], [`ToolRegistry`]); this port handles the JSON Schema
//! rendering that tool-calling runtimes expect.

use restbridge_domain::{ToolDescriptor, ToolRegistry};

/// Port for converting tool descriptors to provider-neutral JSON Schema.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool descriptor to JSON Schema.
    fn tool_to_schema(&self, tool: &ToolDescriptor) -> serde_json::Value;

    /// Convert all tools to a JSON Schema array (sorted by name).
    fn all_tools_schema(&self, registry: &ToolRegistry) -> Vec<serde_json::Value> {
        registry
            .sorted()
            .into_iter()
            .map(|tool| self.tool_to_schema(tool))
            .collect()
    }
}
