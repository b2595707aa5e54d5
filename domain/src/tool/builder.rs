//! Tool descriptor construction

use super::classifier::{ClassifiedField, ClassifiedFields};
use super::entities::{FieldSpec, ToolDescriptor, TypeHint};
use crate::route::entities::RouteDescriptor;

/// Field names hinted as integers. Everything else is a string.
///
/// This is a name lookup, not a type analysis: a serializer field called
/// `count` is still hinted as a string.
pub const INTEGER_FIELDS: [&str; 6] = ["id", "pk", "page", "limit", "offset", "page_size"];

pub fn type_hint_for(name: &str) -> TypeHint {
    if INTEGER_FIELDS.contains(&name) {
        TypeHint::Integer
    } else {
        TypeHint::String
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ToolDescriptorBuilder;

impl ToolDescriptorBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the descriptor for one classified route.
    ///
    /// Required fields come first; classification order is kept within the
    /// required and optional groups.
    pub fn build(&self, route: &RouteDescriptor, classified: &ClassifiedFields) -> ToolDescriptor {
        let spec = |(name, field): (&String, &ClassifiedField)| {
            FieldSpec::new(name.clone(), field.required, field.location, type_hint_for(name))
        };

        let required = classified.fields.iter().filter(|(_, f)| f.required).map(spec);
        let optional = classified.fields.iter().filter(|(_, f)| !f.required).map(spec);

        ToolDescriptor {
            name: route.tool_name(),
            verb: route.verb,
            path_template: route.path_template.clone(),
            description: route.description.clone(),
            fields: required.chain(optional).collect(),
        }
    }
}
