//! Route domain entities

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// HTTP verb of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    #[serde(alias = "get")]
    Get,
    #[serde(alias = "post")]
    Post,
    #[serde(alias = "put")]
    Put,
    #[serde(alias = "patch")]
    Patch,
    #[serde(alias = "delete")]
    Delete,
}

impl HttpVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVerb::Get => "GET",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
            HttpVerb::Patch => "PATCH",
            HttpVerb::Delete => "DELETE",
        }
    }

    /// Verbs that carry a request body (POST, PUT, PATCH)
    pub fn is_write(&self) -> bool {
        matches!(self, HttpVerb::Post | HttpVerb::Put | HttpVerb::Patch)
    }
}

impl std::fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpVerb::Get),
            "POST" => Ok(HttpVerb::Post),
            "PUT" => Ok(HttpVerb::Put),
            "PATCH" => Ok(HttpVerb::Patch),
            "DELETE" => Ok(HttpVerb::Delete),
            other => Err(format!("Unsupported HTTP verb: {}", other)),
        }
    }
}

/// Query-string declarations of a resource handler.
///
/// `None` means "not declared", which differs from an empty list: a handler
/// that declares `search_fields = []` still accepts the `search` parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDeclarations {
    pub search_fields: Option<Vec<String>>,
    pub ordering_fields: Option<Vec<String>>,
    pub filterset_fields: Vec<String>,
}

/// A single discovered route × verb combination.
///
/// Created once by the [`RouteIntrospector`](super::introspector::RouteIntrospector)
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// URL prefix the resource is registered under (e.g. "tasks")
    pub prefix: String,
    /// Resource basename, used for tool naming (e.g. "task")
    pub basename: String,
    /// Handler action (e.g. "list", "partial_update", "completed")
    pub action: String,
    pub verb: HttpVerb,
    /// Portable path template with `{name}` placeholders (e.g. "/tasks/{pk}/")
    pub path_template: String,
    pub description: String,
    /// Writable serializer fields → required flag, in declaration order
    pub body_field_requiredness: IndexMap<String, bool>,
    pub query: QueryDeclarations,
    /// Extra query parameters declared on this action only
    pub extra_query_fields: Vec<String>,
}

impl RouteDescriptor {
    /// Short human label, e.g. "PUT /tasks/{pk}/"
    pub fn label(&self) -> String {
        format!("{} {}", self.verb, self.path_template)
    }

    pub fn tool_name(&self) -> String {
        format!("{}_{}", self.basename, self.action)
    }
}
