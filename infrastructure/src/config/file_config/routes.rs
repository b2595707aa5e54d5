//! Route table source (`[routes]` section)
//!
//! ```toml
//! [routes]
//! table = "routes.toml"                            # TOML or JSON file
//! # url = "http://localhost:8000/api/routes.json"  # or fetch JSON over HTTP
//! ```

use crate::routes::RouteSource;
use restbridge_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoutesConfig {
    pub table: Option<PathBuf>,
    pub url: Option<String>,
}

impl FileRoutesConfig {
    /// Configured source; the file wins when both are set
    pub fn source(&self) -> Option<RouteSource> {
        match (&self.table, &self.url) {
            (Some(path), _) => Some(RouteSource::File(path.clone())),
            (None, Some(url)) => Some(RouteSource::Url(url.clone())),
            (None, None) => None,
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        match (&self.table, &self.url) {
            (Some(_), Some(_)) => vec![ConfigIssue::warning(
                ConfigIssueCode::ConflictingSources,
                "routes.table and routes.url are both set, using routes.table",
            )],
            (None, None) => vec![ConfigIssue::error(
                ConfigIssueCode::NoRouteSource,
                "no route table configured (set routes.table, routes.url or --routes)",
            )],
            _ => vec![],
        }
    }
}
