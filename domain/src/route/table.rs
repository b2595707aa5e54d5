//! Route table: the backing API's declarative description of its endpoints.
//!
//! This is the inbound contract with the API provider. It is deserialized
//! from a TOML or JSON document:
//!
//! ```toml
//! trailing_slash = true
//!
//! [[resources]]
//! prefix = "tasks"
//! basename = "task"
//! lookup_field = "pk"
//! actions = ["list", "create", "retrieve", "update", "partial_update", "destroy"]
//!
//! [resources.descriptions]
//! list = "List every task."
//!
//! [[resources.extra_actions]]
//! name = "completed"
//! detail = false
//! methods = ["GET"]
//!
//! [resources.serializer]
//! fields = [
//!     { name = "title", required = true },
//!     { name = "created_at", read_only = true },
//! ]
//!
//! [resources.filters]
//! search_fields = ["title"]
//! filterset_fields = ["completed"]
//! ```
//!
//! A resource may list raw `routes` explicitly. When it does not, the
//! conventional router layout is derived by [`ResourceRoutes::router_routes`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::entities::QueryDeclarations;

/// Actions a full model resource implements
pub const MODEL_ACTIONS: [&str; 6] = [
    "list",
    "create",
    "retrieve",
    "update",
    "partial_update",
    "destroy",
];

fn default_true() -> bool {
    true
}

fn default_lookup_field() -> String {
    "pk".to_string()
}

fn default_actions() -> Vec<String> {
    MODEL_ACTIONS.iter().map(|a| a.to_string()).collect()
}

/// The complete route table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    /// Router trailing-slash convention
    #[serde(default = "default_true")]
    pub trailing_slash: bool,
    #[serde(default)]
    pub resources: Vec<ResourceRoutes>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            trailing_slash: true,
            resources: Vec::new(),
        }
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trailing_slash(mut self, trailing_slash: bool) -> Self {
        self.trailing_slash = trailing_slash;
        self
    }

    pub fn with_resource(mut self, resource: ResourceRoutes) -> Self {
        self.resources.push(resource);
        self
    }
}

/// One registered resource handler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRoutes {
    /// URL prefix (e.g. "tasks")
    pub prefix: String,
    /// Basename used for tool names (e.g. "task")
    pub basename: String,
    #[serde(default = "default_lookup_field")]
    pub lookup_field: String,
    /// Standard actions implemented on the handler
    #[serde(default = "default_actions")]
    pub actions: Vec<String>,
    /// Per-action documentation
    #[serde(default)]
    pub descriptions: IndexMap<String, String>,
    #[serde(default)]
    pub extra_actions: Vec<ExtraAction>,
    /// Explicit raw routes; when empty, [`router_routes`](Self::router_routes) is used
    #[serde(default)]
    pub routes: Vec<RawRoute>,
    #[serde(default)]
    pub serializer: Option<SerializerSchema>,
    #[serde(default)]
    pub filters: QueryDeclarations,
}

/// Custom action declared on a handler beyond the standard ones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraAction {
    pub name: String,
    /// Detail-level (needs the lookup field) or collection-level
    #[serde(default)]
    pub detail: bool,
    #[serde(default = "default_extra_methods")]
    pub methods: Vec<String>,
    /// URL segment, defaults to the action name
    #[serde(default)]
    pub url_path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Query parameters this action accepts beyond the collection defaults
    #[serde(default)]
    pub query_fields: Vec<String>,
}

fn default_extra_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

/// A raw router entry: anchored pattern + verb → action mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRoute {
    pub pattern: String,
    pub mapping: IndexMap<String, String>,
}

impl RawRoute {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mapping: IndexMap::new(),
        }
    }

    pub fn map(mut self, verb: impl Into<String>, action: impl Into<String>) -> Self {
        self.mapping.insert(verb.into(), action.into());
        self
    }
}

/// Serialization schema of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerSchema {
    #[serde(default)]
    pub fields: Vec<SerializerField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializerField {
    pub name: String,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub read_only: bool,
}

impl SerializerField {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: true,
            read_only: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            read_only: false,
        }
    }

    pub fn read_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: false,
            read_only: true,
        }
    }
}

impl ResourceRoutes {
    pub fn new(prefix: impl Into<String>, basename: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            basename: basename.into(),
            lookup_field: default_lookup_field(),
            actions: default_actions(),
            descriptions: IndexMap::new(),
            extra_actions: Vec::new(),
            routes: Vec::new(),
            serializer: None,
            filters: QueryDeclarations::default(),
        }
    }

    pub fn with_lookup_field(mut self, lookup_field: impl Into<String>) -> Self {
        self.lookup_field = lookup_field.into();
        self
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions = actions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, action: impl Into<String>, doc: impl Into<String>) -> Self {
        self.descriptions.insert(action.into(), doc.into());
        self
    }

    pub fn with_extra_action(mut self, action: ExtraAction) -> Self {
        self.extra_actions.push(action);
        self
    }

    pub fn with_route(mut self, route: RawRoute) -> Self {
        self.routes.push(route);
        self
    }

    pub fn with_serializer(mut self, fields: Vec<SerializerField>) -> Self {
        self.serializer = Some(SerializerSchema { fields });
        self
    }

    pub fn with_filters(mut self, filters: QueryDeclarations) -> Self {
        self.filters = filters;
        self
    }

    /// Whether the handler implements `action`
    pub fn implements(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action) || self.extra_action(action).is_some()
    }

    pub fn extra_action(&self, name: &str) -> Option<&ExtraAction> {
        self.extra_actions.iter().find(|a| a.name == name)
    }

    /// Documentation for an action, or the generic fallback
    pub fn description_for(&self, action: &str) -> String {
        self.descriptions
            .get(action)
            .cloned()
            .or_else(|| self.extra_action(action).and_then(|a| a.description.clone()))
            .unwrap_or_else(|| format!("Action {} on {}.", action, self.basename))
    }

    /// Routes to introspect: the explicit list, or the router-derived layout
    pub fn effective_routes(&self) -> Vec<RawRoute> {
        if self.routes.is_empty() {
            self.router_routes()
        } else {
            self.routes.clone()
        }
    }

    /// Conventional router layout for this resource.
    ///
    /// The standard verb mappings are always emitted; actions the handler
    /// does not implement are filtered out later by the introspector.
    pub fn router_routes(&self) -> Vec<RawRoute> {
        let mut routes = vec![
            RawRoute::new("^{prefix}{trailing_slash}$")
                .map("get", "list")
                .map("post", "create"),
        ];

        for action in self.extra_actions.iter().filter(|a| !a.detail) {
            routes.push(extra_action_route(
                "^{prefix}/{url_path}{trailing_slash}$",
                action,
            ));
        }

        routes.push(
            RawRoute::new("^{prefix}/{lookup}{trailing_slash}$")
                .map("get", "retrieve")
                .map("put", "update")
                .map("patch", "partial_update")
                .map("delete", "destroy"),
        );

        for action in self.extra_actions.iter().filter(|a| a.detail) {
            routes.push(extra_action_route(
                "^{prefix}/{lookup}/{url_path}{trailing_slash}$",
                action,
            ));
        }

        routes
    }
}

fn extra_action_route(template: &str, action: &ExtraAction) -> RawRoute {
    let url_path = action.url_path.as_deref().unwrap_or(&action.name);
    let mut route = RawRoute::new(template.replace("{url_path}", url_path));
    for method in &action.methods {
        route = route.map(method.to_ascii_lowercase(), action.name.clone());
    }
    route
}
