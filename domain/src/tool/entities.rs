//! Tool domain entities

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::error::BuildError;
use crate::route::entities::HttpVerb;

/// Where an argument goes in the outgoing request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldLocation {
    Path,
    Query,
    Body,
}

impl FieldLocation {
    pub fn as_str(&self) -> &str {
        match self {
            FieldLocation::Path => "path",
            FieldLocation::Query => "query",
            FieldLocation::Body => "body",
        }
    }
}

impl std::fmt::Display for FieldLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse argument type, derived from the field name only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeHint {
    Integer,
    String,
}

impl TypeHint {
    pub fn as_str(&self) -> &str {
        match self {
            TypeHint::Integer => "integer",
            TypeHint::String => "string",
        }
    }
}

impl std::fmt::Display for TypeHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parameter of a tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub location: FieldLocation,
    pub type_hint: TypeHint,
}

impl FieldSpec {
    pub fn new(
        name: impl Into<String>,
        required: bool,
        location: FieldLocation,
        type_hint: TypeHint,
    ) -> Self {
        Self {
            name: name.into(),
            required,
            location,
            type_hint,
        }
    }

    /// Render as a signature entry: `id: integer` or `title: string = null`
    pub fn render(&self) -> String {
        if self.required {
            format!("{}: {}", self.name, self.type_hint)
        } else {
            format!("{}: {} = null", self.name, self.type_hint)
        }
    }
}

/// Schema of one generated tool.
///
/// `fields` holds required parameters first, then optional ones; within each
/// group the discovery order of the classifier is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique name, `{basename}_{action}`
    pub name: String,
    pub verb: HttpVerb,
    pub path_template: String,
    pub description: String,
    pub fields: Vec<FieldSpec>,
}

impl ToolDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn fields_at(&self, location: FieldLocation) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(move |f| f.location == location)
    }

    /// Parameter list signature, e.g. `(pk: integer, title: string = null)`
    pub fn signature(&self) -> String {
        let params: Vec<String> = self.fields.iter().map(FieldSpec::render).collect();
        format!("({})", params.join(", "))
    }

    /// Short human label, e.g. "PUT /tasks/{pk}/"
    pub fn label(&self) -> String {
        format!("{} {}", self.verb, self.path_template)
    }
}

/// Registry of every generated tool, keyed by name.
///
/// Filled once during the build phase and read-only afterwards. Iteration
/// follows build order; [`sorted`](Self::sorted) gives name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolRegistry {
    tools: IndexMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Add a descriptor; a name that is already taken is a build error.
    pub fn insert(&mut self, descriptor: ToolDescriptor) -> Result<(), BuildError> {
        if let Some(existing) = self.tools.get(&descriptor.name) {
            return Err(BuildError::DuplicateToolName {
                name: descriptor.name.clone(),
                first: existing.label(),
                second: descriptor.label(),
            });
        }
        self.tools.insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    /// Descriptors ordered by name
    pub fn sorted(&self) -> Vec<&ToolDescriptor> {
        let mut tools: Vec<&ToolDescriptor> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update_tool() -> ToolDescriptor {
        ToolDescriptor {
            name: "task_update".to_string(),
            verb: HttpVerb::Put,
            path_template: "/tasks/{pk}/".to_string(),
            description: "Update a task.".to_string(),
            fields: vec![
                FieldSpec::new("pk", true, FieldLocation::Path, TypeHint::Integer),
                FieldSpec::new("title", true, FieldLocation::Body, TypeHint::String),
                FieldSpec::new("description", false, FieldLocation::Body, TypeHint::String),
            ],
        }
    }

    #[test]
    fn test_signature() {
        assert_eq!(
            update_tool().signature(),
            "(pk: integer, title: string, description: string = null)"
        );
    }

    #[test]
    fn test_field_lookup() {
        let tool = update_tool();
        assert_eq!(tool.field("pk").unwrap().location, FieldLocation::Path);
        assert!(tool.field("missing").is_none());
        assert_eq!(tool.required_fields().count(), 2);
        assert_eq!(tool.fields_at(FieldLocation::Body).count(), 2);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = ToolRegistry::new();
        registry.insert(update_tool()).unwrap();

        let mut other = update_tool();
        other.path_template = "/todo/{pk}/".to_string();
        let err = registry.insert(other).unwrap_err();

        match err {
            BuildError::DuplicateToolName {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "task_update");
                assert_eq!(first, "PUT /tasks/{pk}/");
                assert_eq!(second, "PUT /todo/{pk}/");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_sorted_by_name() {
        let mut registry = ToolRegistry::new();
        let mut b = update_tool();
        b.name = "b_tool".to_string();
        let mut a = update_tool();
        a.name = "a_tool".to_string();
        registry.insert(b).unwrap();
        registry.insert(a).unwrap();

        let build_order: Vec<&str> = registry.names().collect();
        assert_eq!(build_order, vec!["b_tool", "a_tool"]);

        let sorted: Vec<&str> = registry.sorted().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(sorted, vec!["a_tool", "b_tool"]);
    }
}
