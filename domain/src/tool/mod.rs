//! Tool domain module
//!
//! Turns discovered routes into callable tool schemas, and defines what a
//! call produces.
//!
//! ```text
//! ┌────────────────┐    ┌─────────────────┐    ┌────────────────┐
//! │ RouteDescriptor│───▶│ FieldClassifier │───▶│ ToolDescriptor │──▶ ToolRegistry
//! │ (route × verb) │    │ (path/query/    │    │ (name, fields, │
//! └────────────────┘    │  body, required)│    │  signature)    │
//!                       └─────────────────┘    └────────────────┘
//!
//! Arguments ──▶ ArgumentValidator ──▶ ResolvedRequest ──▶ … ──▶ InvocationResult
//! ```
//!
//! # Key Types
//!
//! - [`FieldClassifier`] with its [`QueryFieldPolicy`]: per-route field
//!   placement and requiredness
//! - [`ToolDescriptorBuilder`]: required-first ordering and type hints
//! - [`ToolDescriptor`] / [`ToolRegistry`]: the schema side, immutable after
//!   the build phase
//! - [`ResolvedRequest`]: argument placement for one call
//! - [`InvocationResult`]: the outcome side, never an error
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`ToolHostPort`, `ApiInvokerPort`): ports for the host
//!   and the outbound HTTP call
//! - **Infrastructure** (`LocalToolHost`, `HttpApiInvoker`): concrete adapters

pub mod arguments;
pub mod builder;
pub mod classifier;
pub mod entities;
pub mod traits;
pub mod value_objects;

pub use arguments::{Arguments, ResolvedRequest};
pub use builder::ToolDescriptorBuilder;
pub use classifier::{ClassifiedFields, FieldClassifier, QueryFieldPolicy, QueryScope};
pub use entities::{FieldLocation, FieldSpec, ToolDescriptor, ToolRegistry, TypeHint};
pub use traits::{ArgumentValidator, DefaultArgumentValidator};
pub use value_objects::{InvocationPayload, InvocationResult, InvocationStatus};
