//! Building blocks shared by the per-dialect schema synthesizers.

use indexmap::IndexMap;
use log::debug;
use serde_json::{Map, Value};

use crate::tree::{Action, RequestDefaults, ValidationSchema};

/// Types that are schema-checked. A fragment declaring any other type (a
/// `File`, an unresolved model name) is replaced by the permissive `{}`.
pub const BASIC_TYPES: &[&str] = &[
    "string", "number", "float", "integer", "object", "array", "boolean", "null",
];

/// How a parameter contributes to the `{ body, params }` request shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A request body parameter. Its type defaults to `object`.
    Body,
    /// A form field, stored as the body without the `object` default.
    FormData,
    /// Path, query, header and cookie parameters.
    Params,
}

impl ParamKind {
    /// Classify by `paramType` (Swagger 1.2) or `in` (Swagger 2.0, OpenAPI 3.0).
    pub fn classify(location: &str) -> ParamKind {
        match location {
            "body" => ParamKind::Body,
            "formData" => ParamKind::FormData,
            _ => ParamKind::Params,
        }
    }
}

/// The empty schema, which accepts anything.
pub fn permissive() -> Value {
    Value::Object(Map::new())
}

pub fn has_basic_type(fragment: &Map<String, Value>) -> bool {
    match fragment.get("type") {
        None | Some(Value::Null) => true,
        Some(Value::String(t)) => BASIC_TYPES.contains(&t.as_str()),
        Some(_) => false,
    }
}

/// Keep a fragment when its type is basic, otherwise allow anything.
pub fn checked(fragment: Map<String, Value>) -> Value {
    if has_basic_type(&fragment) {
        Value::Object(fragment)
    } else {
        permissive()
    }
}

/// Like [`checked`], defaulting a missing type to `object`.
pub fn checked_body(mut fragment: Map<String, Value>) -> Value {
    if !has_basic_type(&fragment) {
        return permissive();
    }
    if matches!(fragment.get("type"), None | Some(Value::Null)) {
        fragment.insert("type".to_string(), Value::String("object".to_string()));
    }
    Value::Object(fragment)
}

/// Body-like parameters replace the body schema, so the last one declared wins.
pub fn set_body(schema: &mut ValidationSchema, kind: ParamKind, fragment: Map<String, Value>) {
    schema.properties.body = match kind {
        ParamKind::Body => checked_body(fragment),
        ParamKind::FormData | ParamKind::Params => checked(fragment),
    };
}

pub fn insert_param(schema: &mut ValidationSchema, name: &str, fragment: Value, required: bool) {
    if name.is_empty() {
        debug!("skipping parameter without a name");
        return;
    }
    let params = &mut schema.properties.params;
    if required {
        params.required.push(name.to_string());
    }
    params.properties.insert(name.to_string(), fragment);
}

/// Operation-level consumes win over document-level ones when non-empty.
pub fn effective_consumes<'c>(operation: &'c [String], document: &'c [String]) -> &'c [String] {
    if operation.is_empty() { document } else { operation }
}

/// Compare the media type essence, ignoring parameters such as `charset`.
pub fn is_json_media_type(media_type: &str) -> bool {
    media_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// Combine path-level and operation-level parameters. An operation parameter
/// replaces a path parameter with the same name and location in place; the
/// remaining operation parameters follow in declaration order.
pub fn merge_parameters<'p, P>(
    shared: &'p [P],
    own: &'p [P],
    key: impl Fn(&P) -> (&str, &str),
) -> Vec<&'p P> {
    let mut merged: IndexMap<(&str, &str), &'p P> = IndexMap::new();
    for param in shared.iter().chain(own) {
        merged.insert(key(param), param);
    }
    merged.into_values().collect()
}

pub fn build_action(
    template: &str,
    method: &str,
    content_type: Option<&str>,
    schema: Option<ValidationSchema>,
) -> Action {
    Action {
        path_template: template.to_string(),
        defaults: RequestDefaults::new(method, content_type),
        schema,
    }
}

/// JavaScript-style truthiness, used for loosely typed Swagger 1.2 flags.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
