//! Domain layer for restbridge
//!
//! This crate contains the core logic for turning a REST API's route table
//! into callable tool schemas. It performs no I/O and has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Build phase
//!
//! A [`RouteTable`] is introspected into [`RouteDescriptor`]s, each route is
//! classified into path / query / body fields, and a [`ToolDescriptor`] is
//! built per route × verb. All descriptors land in a [`ToolRegistry`], which
//! rejects duplicate names.
//!
//! ## Serve phase
//!
//! A call supplies an argument bag; [`ResolvedRequest`] places each argument
//! in the path, query or body, and the outcome is always an
//! [`InvocationResult`], never an error.

pub mod config;
pub mod core;
pub mod route;
pub mod tool;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, Severity};
pub use core::error::{BuildError, FieldError};
pub use route::{
    ExtraAction, HttpVerb, Introspection, QueryDeclarations, RawRoute, ResourceRoutes,
    RouteDescriptor, RouteIntrospector, RouteTable, SerializerField, SerializerSchema,
    SkippedRoute,
};
pub use tool::{
    ArgumentValidator, Arguments, DefaultArgumentValidator, FieldClassifier, FieldLocation,
    FieldSpec, InvocationPayload, InvocationResult, InvocationStatus, QueryFieldPolicy, QueryScope,
    ResolvedRequest, ToolDescriptor, ToolDescriptorBuilder, ToolRegistry, TypeHint,
};
