//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces provider-neutral
//! JSON Schema for tool-calling runtimes.

use restbridge_application::ToolSchemaPort;
use restbridge_domain::{FieldLocation, ToolDescriptor, TypeHint};
use serde_json::{Map, Value, json};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Optional parameters accept `null` alongside their hinted type. Each
/// property carries an `x-location` of `path`, `query` or `body`.
pub struct JsonSchemaToolConverter;

impl JsonSchemaToolConverter {
    fn property_description(location: FieldLocation, required: bool) -> String {
        match (location, required) {
            (FieldLocation::Path, _) => "Path parameter".to_string(),
            (location, true) => format!("Required {} parameter", location),
            (location, false) => format!("Optional {} parameter", location),
        }
    }
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDescriptor) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &tool.fields {
            let schema_type = match field.type_hint {
                TypeHint::Integer => "integer",
                TypeHint::String => "string",
            };
            let type_value = if field.required {
                json!(schema_type)
            } else {
                json!([schema_type, "null"])
            };

            properties.insert(
                field.name.clone(),
                json!({
                    "type": type_value,
                    "description": Self::property_description(field.location, field.required),
                    "x-location": field.location.as_str(),
                }),
            );

            if field.required {
                required.push(json!(field.name));
            }
        }

        json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restbridge_domain::{FieldSpec, HttpVerb, ToolRegistry};

    fn update_tool() -> ToolDescriptor {
        ToolDescriptor {
            name: "task_update".to_string(),
            verb: HttpVerb::Put,
            path_template: "/tasks/{pk}/".to_string(),
            description: "Update a task.".to_string(),
            fields: vec![
                FieldSpec::new("pk", true, FieldLocation::Path, TypeHint::Integer),
                FieldSpec::new("title", false, FieldLocation::Body, TypeHint::String),
            ],
        }
    }

    #[test]
    fn test_tool_to_schema() {
        let schema = JsonSchemaToolConverter.tool_to_schema(&update_tool());

        assert_eq!(schema["name"], "task_update");
        assert_eq!(schema["description"], "Update a task.");
        let input = &schema["input_schema"];
        assert_eq!(input["type"], "object");
        assert_eq!(input["required"], json!(["pk"]));
        assert_eq!(input["properties"]["pk"]["type"], "integer");
        assert_eq!(input["properties"]["pk"]["x-location"], "path");
        assert_eq!(input["properties"]["title"]["type"], json!(["string", "null"]));
        assert_eq!(input["additionalProperties"], false);
    }

    #[test]
    fn test_all_tools_schema_sorted() {
        let mut registry = ToolRegistry::new();
        let mut b = update_tool();
        b.name = "b_tool".to_string();
        let mut a = update_tool();
        a.name = "a_tool".to_string();
        registry.insert(b).unwrap();
        registry.insert(a).unwrap();

        let schemas = JsonSchemaToolConverter.all_tools_schema(&registry);
        let names: Vec<&str> = schemas.iter().filter_map(|s| s["name"].as_str()).collect();
        assert_eq!(names, vec!["a_tool", "b_tool"]);
    }
}
