//! Route domain module
//!
//! Everything the build phase knows about the backing API comes through
//! here: the declarative [`RouteTable`], the pattern normalization rules and
//! the [`RouteIntrospector`] that turns the table into [`RouteDescriptor`]s.
//!
//! ```text
//! RouteTable ──▶ RouteIntrospector ──▶ Vec<RouteDescriptor>
//!  (resources,      (normalize patterns,     (one per route × verb,
//!   raw routes)      filter actions)           immutable)
//! ```

pub mod entities;
pub mod introspector;
pub mod pattern;
pub mod table;

pub use entities::{HttpVerb, QueryDeclarations, RouteDescriptor};
pub use introspector::{Introspection, RouteIntrospector, SkippedRoute};
pub use table::{ExtraAction, RawRoute, ResourceRoutes, RouteTable, SerializerField, SerializerSchema};
