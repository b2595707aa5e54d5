//! Emit Documentation use case
//!
//! Documentation is a by-product of the build: a failing sink is logged and
//! the caller carries on.

use crate::ports::documentation::DocumentationSinkPort;
use restbridge_domain::ToolRegistry;
use tracing::{info, warn};

pub struct EmitDocumentationUseCase<'a> {
    sink: &'a dyn DocumentationSinkPort,
}

impl<'a> EmitDocumentationUseCase<'a> {
    pub fn new(sink: &'a dyn DocumentationSinkPort) -> Self {
        Self { sink }
    }

    /// Emit the registry's documentation. Returns whether it was written.
    pub fn execute(&self, registry: &ToolRegistry) -> bool {
        match self.sink.emit(registry) {
            Ok(()) => {
                info!(
                    "Wrote documentation for {} tools to {}",
                    registry.len(),
                    self.sink.target()
                );
                true
            }
            Err(e) => {
                warn!("Documentation not written: {}", e);
                false
            }
        }
    }
}
