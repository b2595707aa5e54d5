//! Tool domain traits
//!
//! Pure validation of an argument bag against a [`ToolDescriptor`]. The async
//! host and invoker ports live in the application layer.

use super::arguments::Arguments;
use super::entities::ToolDescriptor;

/// Validator for tool calls
pub trait ArgumentValidator {
    /// Check `arguments` against `descriptor`; `Err` carries the reason
    /// reported back to the caller.
    fn validate(&self, descriptor: &ToolDescriptor, arguments: &Arguments) -> Result<(), String>;
}

/// Rejects unknown arguments and missing or null required ones
#[derive(Debug, Clone, Default)]
pub struct DefaultArgumentValidator;

impl ArgumentValidator for DefaultArgumentValidator {
    fn validate(&self, descriptor: &ToolDescriptor, arguments: &Arguments) -> Result<(), String> {
        for field in descriptor.required_fields() {
            match arguments.get(&field.name) {
                None => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        field.name, descriptor.name
                    ));
                }
                Some(value) if value.is_null() => {
                    return Err(format!(
                        "Required parameter '{}' for tool '{}' is null",
                        field.name, descriptor.name
                    ));
                }
                Some(_) => {}
            }
        }

        for name in arguments.keys() {
            if descriptor.field(name).is_none() {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    name, descriptor.name
                ));
            }
        }

        Ok(())
    }
}
