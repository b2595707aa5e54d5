//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod api;
mod docs;
mod query;
mod routes;

pub use api::FileApiConfig;
pub use docs::FileDocsConfig;
pub use query::FileQueryConfig;
pub use routes::FileRoutesConfig;

use restbridge_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Backing API connection
    pub api: FileApiConfig,
    /// Where the route table comes from
    pub routes: FileRoutesConfig,
    /// Query parameter policy
    pub query: FileQueryConfig,
    /// Documentation artifact
    pub docs: FileDocsConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. The API base URL and timeout
    /// 2. That exactly one route source is usable
    /// 3. Enum parse failures in the query policy
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.api.validate());
        issues.extend(self.routes.validate());
        issues.extend(self.query.parse_policy().1);
        issues
    }
}
