//! Core domain concepts shared across all subdomains.
//!
//! - [`error::BuildError`] / [`error::FieldError`]: build-phase errors
//! - [`string`]: identifier checks and truncation helpers

pub mod error;
pub mod string;
