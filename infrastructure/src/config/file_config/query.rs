//! Query parameter policy (`[query]` section)
//!
//! Controls which GET routes receive the conventional query parameters.
//!
//! ```toml
//! [query]
//! scope = "collection"         # collection | list_action_only | all_get
//! pagination = ["page", "page_size", "limit", "offset"]
//! search_param = "search"
//! ordering_param = "ordering"
//! list_actions = ["list"]
//! ```

use restbridge_domain::{ConfigIssue, ConfigIssueCode, QueryFieldPolicy, QueryScope, Severity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileQueryConfig {
    pub scope: String,
    pub pagination: Vec<String>,
    pub search_param: String,
    pub ordering_param: String,
    pub list_actions: Vec<String>,
}

impl Default for FileQueryConfig {
    fn default() -> Self {
        let policy = QueryFieldPolicy::default();
        Self {
            scope: policy.scope.as_str().to_string(),
            pagination: policy.pagination,
            search_param: policy.search_param,
            ordering_param: policy.ordering_param,
            list_actions: policy.list_actions,
        }
    }
}

impl FileQueryConfig {
    /// Parse into a [`QueryFieldPolicy`]
    ///
    /// An unknown scope falls back to `collection` with a warning.
    pub fn parse_policy(&self) -> (QueryFieldPolicy, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let scope = match self.scope.parse::<QueryScope>() {
            Ok(scope) => scope,
            Err(_) => {
                issues.push(ConfigIssue {
                    severity: Severity::Warning,
                    code: ConfigIssueCode::InvalidEnumValue {
                        field: "query.scope".to_string(),
                        value: self.scope.clone(),
                        valid_values: QueryScope::valid_values()
                            .iter()
                            .map(|v| v.to_string())
                            .collect(),
                    },
                    message: format!(
                        "query.scope: unknown value '{}', falling back to 'collection'",
                        self.scope
                    ),
                });
                QueryScope::default()
            }
        };

        let policy = QueryFieldPolicy {
            scope,
            pagination: self.pagination.clone(),
            search_param: self.search_param.clone(),
            ordering_param: self.ordering_param.clone(),
            list_actions: self.list_actions.clone(),
        };
        (policy, issues)
    }
}
