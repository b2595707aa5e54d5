//! Backing API configuration (`[api]` section)
//!
//! ```toml
//! [api]
//! base_url = "https://tasks.example.com/api"
//! token = "…"            # sent as `Authorization: Token …`
//! timeout_secs = 30
//! ```

use restbridge_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApiConfig {
    /// Base URL every path template is appended to
    pub base_url: String,
    /// API token; no `Authorization` header when unset
    pub token: Option<String>,
    /// Upper bound for one whole call
    pub timeout_secs: u64,
}

impl Default for FileApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl FileApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Token, treating an empty string as unset
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingValue {
                    field: "api.base_url".to_string(),
                },
                "api.base_url is empty",
            ));
        } else if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://")
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: "api.base_url".to_string(),
                    value: self.base_url.clone(),
                    valid_values: vec!["http://…".to_string(), "https://…".to_string()],
                },
                format!("api.base_url: '{}' is not an http(s) URL", self.base_url),
            ));
        }

        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "api.timeout_secs".to_string(),
                    value: "0".to_string(),
                },
                "api.timeout_secs cannot be 0",
            ));
        }

        issues
    }
}
