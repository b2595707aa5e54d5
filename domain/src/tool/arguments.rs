//! Argument bags and their placement in an outgoing request

use serde_json::{Map, Value};

use crate::route::entities::HttpVerb;
use crate::route::pattern::{placeholders, substitute_placeholders};

/// Keyword arguments of one tool call
pub type Arguments = Map<String, Value>;

/// Where each argument of a call ended up
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRequest {
    /// Path with every supplied placeholder substituted
    pub path: String,
    /// Query pairs; an array argument yields one pair per element
    pub query: Vec<(String, String)>,
    pub body: Map<String, Value>,
}

impl ResolvedRequest {
    /// Place each non-null argument:
    ///
    /// - `{key}` appears in the template: substituted into the path;
    /// - GET: query string;
    /// - otherwise: JSON body.
    pub fn resolve(verb: HttpVerb, path_template: &str, arguments: &Arguments) -> Self {
        let path_keys = placeholders(path_template);
        let path = substitute_placeholders(path_template, |name| {
            arguments
                .get(name)
                .filter(|value| !value.is_null())
                .map(|value| encode_path_segment(&value_to_string(value)))
        });

        let mut resolved = ResolvedRequest {
            path,
            ..Default::default()
        };

        for (key, value) in arguments {
            if value.is_null() || path_keys.contains(key) {
                continue;
            }

            if verb == HttpVerb::Get {
                match value {
                    Value::Array(items) => {
                        for item in items.iter().filter(|v| !v.is_null()) {
                            resolved.query.push((key.clone(), value_to_string(item)));
                        }
                    }
                    _ => resolved.query.push((key.clone(), value_to_string(value))),
                }
            } else {
                resolved.body.insert(key.clone(), value.clone());
            }
        }

        resolved
    }
}

/// String form of a JSON value for paths and query strings.
///
/// Strings are used as-is (no surrounding quotes); scalars use their JSON
/// text; arrays and objects are serialized compactly.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Percent-encode the characters that would change the shape of a path,
/// including the braces of a placeholder token.
pub fn encode_path_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '%' => out.push_str("%25"),
            '/' => out.push_str("%2F"),
            '?' => out.push_str("%3F"),
            '#' => out.push_str("%23"),
            ' ' => out.push_str("%20"),
            '{' => out.push_str("%7B"),
            '}' => out.push_str("%7D"),
            _ => out.push(c),
        }
    }
    out
}
