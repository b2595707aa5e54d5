//! Route table sources

mod loader;

pub use loader::{RouteSource, RouteTableError, RouteTableLoader, TableFormat, parse_table};
