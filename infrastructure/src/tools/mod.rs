//! Tool hosting and schema rendering
//!
//! - [`LocalToolHost`]: in-process implementation of `ToolHostPort`
//! - [`JsonSchemaToolConverter`]: implementation of `ToolSchemaPort`

mod host;
mod schema;

pub use host::{CANCELLED, HostedToolInfo, LocalToolHost};
pub use schema::JsonSchemaToolConverter;
