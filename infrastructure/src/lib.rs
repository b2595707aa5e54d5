//! Infrastructure layer for restbridge
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod docs;
pub mod http;
pub mod routes;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigOverrides, FileConfig};
pub use docs::MarkdownDocumentation;
pub use http::{HttpApiInvoker, InvokerError};
pub use routes::{RouteSource, RouteTableError, RouteTableLoader};
pub use tools::{JsonSchemaToolConverter, LocalToolHost};
