//! Route introspection: route table → [`RouteDescriptor`]s.
//!
//! Walks every resource of a [`RouteTable`], normalizes each raw pattern to a
//! `{name}` template and emits one descriptor per route × verb whose action
//! the handler actually implements. Unimplemented actions are expected (a
//! read-only resource still gets the full router layout) and are skipped.

use indexmap::IndexMap;
use std::collections::HashSet;

use super::entities::{HttpVerb, RouteDescriptor};
use super::pattern::{PatternContext, normalize_pattern};
use super::table::{ResourceRoutes, RouteTable};
use crate::core::error::BuildError;

/// Why a mapping entry produced no descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRoute {
    pub basename: String,
    pub verb: String,
    pub action: String,
}

/// Output of one introspection pass
#[derive(Debug, Clone, Default)]
pub struct Introspection {
    pub routes: Vec<RouteDescriptor>,
    pub skipped: Vec<SkippedRoute>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RouteIntrospector;

impl RouteIntrospector {
    pub fn new() -> Self {
        Self
    }

    /// Introspect the whole table, in resource → route → mapping order.
    pub fn introspect(&self, table: &RouteTable) -> Result<Introspection, BuildError> {
        let mut out = Introspection::default();
        for resource in &table.resources {
            self.introspect_resource(resource, table.trailing_slash, &mut out)?;
        }
        Ok(out)
    }

    fn introspect_resource(
        &self,
        resource: &ResourceRoutes,
        trailing_slash: bool,
        out: &mut Introspection,
    ) -> Result<(), BuildError> {
        if resource.basename.trim().is_empty() {
            return Err(BuildError::UnreadableRouteTable(format!(
                "resource with prefix '{}' has an empty basename",
                resource.prefix
            )));
        }

        let body_fields = writable_fields(resource)?;
        let ctx = PatternContext {
            prefix: &resource.prefix,
            lookup_field: &resource.lookup_field,
            trailing_slash,
        };

        for route in resource.effective_routes() {
            let path_template = normalize_pattern(&route.pattern, ctx);

            for (verb, action) in &route.mapping {
                if !resource.implements(action) {
                    out.skipped.push(SkippedRoute {
                        basename: resource.basename.clone(),
                        verb: verb.to_ascii_uppercase(),
                        action: action.clone(),
                    });
                    continue;
                }

                let verb: HttpVerb = verb.parse().map_err(|e: String| {
                    BuildError::UnreadableRouteTable(format!(
                        "{} on '{}': {}",
                        action, resource.basename, e
                    ))
                })?;

                let extra_query_fields = resource
                    .extra_action(action)
                    .map(|a| a.query_fields.clone())
                    .unwrap_or_default();

                out.routes.push(RouteDescriptor {
                    prefix: resource.prefix.clone(),
                    basename: resource.basename.clone(),
                    action: action.clone(),
                    verb,
                    path_template: path_template.clone(),
                    description: resource.description_for(action),
                    body_field_requiredness: body_fields.clone(),
                    query: resource.filters.clone(),
                    extra_query_fields,
                });
            }
        }

        Ok(())
    }
}

/// Non-read-only serializer fields → required flag
fn writable_fields(resource: &ResourceRoutes) -> Result<IndexMap<String, bool>, BuildError> {
    let mut fields = IndexMap::new();
    let Some(schema) = &resource.serializer else {
        return Ok(fields);
    };

    let mut seen = HashSet::new();
    for field in &schema.fields {
        if field.name.trim().is_empty() {
            return Err(BuildError::UnreadableSchema {
                resource: resource.basename.clone(),
                reason: "field with an empty name".to_string(),
            });
        }
        if !seen.insert(field.name.as_str()) {
            return Err(BuildError::UnreadableSchema {
                resource: resource.basename.clone(),
                reason: format!("field '{}' declared twice", field.name),
            });
        }
        if !field.read_only {
            fields.insert(field.name.clone(), field.required);
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::table::{ExtraAction, RawRoute, SerializerField};

    fn task_resource() -> ResourceRoutes {
        ResourceRoutes::new("tasks", "task")
            .with_serializer(vec![
                SerializerField::read_only("id"),
                SerializerField::required("title"),
                SerializerField::optional("description"),
                SerializerField::read_only("created_at"),
            ])
            .with_extra_action(ExtraAction {
                name: "completed".to_string(),
                detail: false,
                methods: vec!["GET".to_string()],
                url_path: None,
                description: Some("Completed tasks only.".to_string()),
                query_fields: Vec::new(),
            })
    }

    #[test]
    fn test_model_resource_routes() {
        let table = RouteTable::new().with_resource(task_resource());
        let result = RouteIntrospector::new().introspect(&table).unwrap();

        let summary: Vec<(String, String, String)> = result
            .routes
            .iter()
            .map(|r| (r.action.clone(), r.verb.to_string(), r.path_template.clone()))
            .collect();

        let expected = [
            ("list", "GET", "/tasks/"),
            ("create", "POST", "/tasks/"),
            ("completed", "GET", "/tasks/completed/"),
            ("retrieve", "GET", "/tasks/{pk}/"),
            ("update", "PUT", "/tasks/{pk}/"),
            ("partial_update", "PATCH", "/tasks/{pk}/"),
            ("destroy", "DELETE", "/tasks/{pk}/"),
        ];
        let expected: Vec<(String, String, String)> = expected
            .iter()
            .map(|(a, v, p)| (a.to_string(), v.to_string(), p.to_string()))
            .collect();
        assert_eq!(summary, expected);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_read_only_fields_excluded_from_body() {
        let table = RouteTable::new().with_resource(task_resource());
        let result = RouteIntrospector::new().introspect(&table).unwrap();
        let create = result.routes.iter().find(|r| r.action == "create").unwrap();

        let names: Vec<&str> = create
            .body_field_requiredness
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(names, vec!["title", "description"]);
        assert_eq!(create.body_field_requiredness["title"], true);
        assert_eq!(create.body_field_requiredness["description"], false);
    }

    #[test]
    fn test_unimplemented_actions_skipped() {
        let resource = ResourceRoutes::new("tags", "tag").with_actions(["list", "retrieve"]);
        let table = RouteTable::new().with_resource(resource);
        let result = RouteIntrospector::new().introspect(&table).unwrap();

        let actions: Vec<&str> = result.routes.iter().map(|r| r.action.as_str()).collect();
        assert_eq!(actions, vec!["list", "retrieve"]);
        assert_eq!(result.skipped.len(), 4);
        assert!(result.skipped.iter().any(|s| s.action == "destroy"));
    }

    #[test]
    fn test_explicit_route_with_named_group() {
        let resource = ResourceRoutes::new("projects", "project")
            .with_actions(["members"])
            .with_route(
                RawRoute::new(r"^{prefix}/(?P<project_id>[0-9]+)/members/(?P<user>[^/.]+)/$")
                    .map("get", "members"),
            );
        let table = RouteTable::new().with_resource(resource);
        let result = RouteIntrospector::new().introspect(&table).unwrap();

        assert_eq!(result.routes.len(), 1);
        assert_eq!(
            result.routes[0].path_template,
            "/projects/{project_id}/members/{user}/"
        );
    }

    #[test]
    fn test_custom_lookup_and_no_trailing_slash() {
        let resource = ResourceRoutes::new("projects", "project")
            .with_lookup_field("slug")
            .with_actions(["retrieve"]);
        let table = RouteTable::new()
            .with_trailing_slash(false)
            .with_resource(resource);
        let result = RouteIntrospector::new().introspect(&table).unwrap();
        assert_eq!(result.routes[0].path_template, "/projects/{slug}");
    }

    #[test]
    fn test_duplicate_serializer_field_is_unreadable() {
        let resource = ResourceRoutes::new("tasks", "task").with_serializer(vec![
            SerializerField::required("title"),
            SerializerField::optional("title"),
        ]);
        let table = RouteTable::new().with_resource(resource);
        let err = RouteIntrospector::new().introspect(&table).unwrap_err();
        assert!(matches!(err, BuildError::UnreadableSchema { .. }));
    }

    #[test]
    fn test_unknown_verb_is_unreadable() {
        let resource = ResourceRoutes::new("tasks", "task")
            .with_actions(["list"])
            .with_route(RawRoute::new("^tasks/$").map("options", "list"));
        let table = RouteTable::new().with_resource(resource);
        let err = RouteIntrospector::new().introspect(&table).unwrap_err();
        assert!(matches!(err, BuildError::UnreadableRouteTable(_)));
    }
}
