//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod build_registry;
pub mod dispatch;
pub mod emit_docs;
