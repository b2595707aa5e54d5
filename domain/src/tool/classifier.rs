//! Field classification: which arguments a route accepts, and where they go.
//!
//! For one [`RouteDescriptor`] the classifier produces an ordered mapping
//! name → (required, location):
//!
//! 1. every `{name}` placeholder of the path template: required, path;
//! 2. on POST/PUT/PATCH, every writable serializer field: body, with the
//!    serializer's requiredness (always optional for a partial update);
//! 3. on GET, the conventional query parameters when the [`QueryFieldPolicy`]
//!    considers the route a collection, then the action's extra query fields.
//!
//! A later entry never replaces an earlier one, so a path placeholder always
//! wins over a body or query field of the same name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::entities::FieldLocation;
use crate::core::error::{BuildError, FieldError};
use crate::core::string::is_identifier;
use crate::route::entities::{HttpVerb, RouteDescriptor};
use crate::route::pattern::{has_placeholder, placeholders};

/// Action name that is always a partial update, whatever its verb
pub const PARTIAL_UPDATE_ACTION: &str = "partial_update";

/// Which GET routes receive the conventional query parameters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryScope {
    /// Routes without a placeholder, or whose action is a list action
    #[default]
    Collection,
    /// Only list actions
    ListActionOnly,
    /// Every GET route
    AllGet,
}

impl QueryScope {
    pub fn as_str(&self) -> &str {
        match self {
            QueryScope::Collection => "collection",
            QueryScope::ListActionOnly => "list_action_only",
            QueryScope::AllGet => "all_get",
        }
    }

    pub fn valid_values() -> &'static [&'static str] {
        &["collection", "list_action_only", "all_get"]
    }
}

impl std::str::FromStr for QueryScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collection" => Ok(QueryScope::Collection),
            "list_action_only" => Ok(QueryScope::ListActionOnly),
            "all_get" => Ok(QueryScope::AllGet),
            other => Err(format!("Unknown query scope: {}", other)),
        }
    }
}

/// Conventional query parameters and where they apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFieldPolicy {
    pub scope: QueryScope,
    pub pagination: Vec<String>,
    /// Added when the handler declares search fields
    pub search_param: String,
    /// Added when the handler declares ordering fields
    pub ordering_param: String,
    pub list_actions: Vec<String>,
}

impl Default for QueryFieldPolicy {
    fn default() -> Self {
        Self {
            scope: QueryScope::Collection,
            pagination: ["page", "page_size", "limit", "offset"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            search_param: "search".to_string(),
            ordering_param: "ordering".to_string(),
            list_actions: vec!["list".to_string()],
        }
    }
}

impl QueryFieldPolicy {
    pub fn with_scope(mut self, scope: QueryScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_pagination<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pagination = names.into_iter().map(Into::into).collect();
        self
    }

    fn is_list_action(&self, action: &str) -> bool {
        self.list_actions.iter().any(|a| a == action)
    }

    /// Whether a GET route receives the conventional query parameters
    pub fn applies_to(&self, route: &RouteDescriptor) -> bool {
        match self.scope {
            QueryScope::Collection => {
                !has_placeholder(&route.path_template) || self.is_list_action(&route.action)
            }
            QueryScope::ListActionOnly => self.is_list_action(&route.action),
            QueryScope::AllGet => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedField {
    pub required: bool,
    pub location: FieldLocation,
}

/// Classification of one route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedFields {
    /// Discovery order: path, then body or query
    pub fields: IndexMap<String, ClassifiedField>,
    /// Fields that were not valid identifiers
    pub dropped: Vec<FieldError>,
}

impl ClassifiedFields {
    pub fn get(&self, name: &str) -> Option<&ClassifiedField> {
        self.fields.get(name)
    }

    fn add(&mut self, route: &RouteDescriptor, name: &str, field: ClassifiedField) {
        if !is_identifier(name) {
            self.dropped.push(FieldError::NotAnIdentifier {
                route: route.tool_name(),
                field: name.to_string(),
            });
            return;
        }
        if !self.fields.contains_key(name) {
            self.fields.insert(name.to_string(), field);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldClassifier {
    policy: QueryFieldPolicy,
}

impl FieldClassifier {
    pub fn new(policy: QueryFieldPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &QueryFieldPolicy {
        &self.policy
    }

    pub fn classify(&self, route: &RouteDescriptor) -> Result<ClassifiedFields, BuildError> {
        let mut out = ClassifiedFields::default();

        for name in placeholders(&route.path_template) {
            if !is_identifier(&name) {
                return Err(BuildError::InvalidPlaceholder {
                    placeholder: name,
                    path: route.path_template.clone(),
                });
            }
            out.fields.insert(
                name,
                ClassifiedField {
                    required: true,
                    location: FieldLocation::Path,
                },
            );
        }

        if route.verb.is_write() {
            let partial = route.verb == HttpVerb::Patch || route.action == PARTIAL_UPDATE_ACTION;
            for (name, required) in &route.body_field_requiredness {
                out.add(
                    route,
                    name,
                    ClassifiedField {
                        required: *required && !partial,
                        location: FieldLocation::Body,
                    },
                );
            }
        } else if route.verb == HttpVerb::Get {
            let optional_query = ClassifiedField {
                required: false,
                location: FieldLocation::Query,
            };
            for name in self.query_fields(route) {
                out.add(route, name, optional_query);
            }
        }

        Ok(out)
    }

    /// Query parameter names for a GET route, in classification order
    fn query_fields<'a>(&'a self, route: &'a RouteDescriptor) -> Vec<&'a str> {
        let mut names: Vec<&str> = Vec::new();

        if self.policy.applies_to(route) {
            names.extend(self.policy.pagination.iter().map(String::as_str));
            if route.query.search_fields.is_some() {
                names.push(&self.policy.search_param);
            }
            if route.query.ordering_fields.is_some() {
                names.push(&self.policy.ordering_param);
            }
            names.extend(route.query.filterset_fields.iter().map(String::as_str));
        }
        names.extend(route.extra_query_fields.iter().map(String::as_str));

        names
    }
}
