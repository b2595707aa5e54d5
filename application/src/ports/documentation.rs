//! Documentation sink port
//!
//! Receives the finished registry and produces a human-readable artifact.

use restbridge_domain::ToolRegistry;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentationError {
    #[error("Failed to write documentation to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait DocumentationSinkPort: Send + Sync {
    /// Where the artifact goes, for log messages
    fn target(&self) -> String;

    fn emit(&self, registry: &ToolRegistry) -> Result<(), DocumentationError>;
}
