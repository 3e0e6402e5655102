use std::collections::HashSet;

use log::debug;
use serde_json::{Map, Value};

/// Keys whose string value names an entry of the lookup table.
const POINTER_REF_KEYS: &[&str] = &["$ref"];

/// Swagger 1.2 models are also referenced by bare name from `type` and
/// `responseModel`.
const LEGACY_REF_KEYS: &[&str] = &["$ref", "type", "responseModel"];

/// Splices referenced definitions into a document tree.
///
/// A reference does not become a nested pointer: the keys of the referenced
/// definition are merged into the object holding the reference, and the
/// reference key itself disappears. References to unknown names are kept
/// verbatim. A reference to a definition that is already being expanded on
/// the current path is also kept verbatim, which keeps cyclic models finite.
pub struct RefResolver<'a> {
    table: &'a Map<String, Value>,
    ref_keys: &'static [&'static str],
    expanding: HashSet<String>,
}

impl<'a> RefResolver<'a> {
    /// Resolver for `$ref` pointers whose values are keys of `table`.
    pub fn new(table: &'a Map<String, Value>) -> Self {
        Self {
            table,
            ref_keys: POINTER_REF_KEYS,
            expanding: HashSet::new(),
        }
    }

    /// Resolver for Swagger 1.2, where `type` and `responseModel` act as
    /// implicit references to models.
    pub fn legacy(table: &'a Map<String, Value>) -> Self {
        Self {
            table,
            ref_keys: LEGACY_REF_KEYS,
            expanding: HashSet::new(),
        }
    }

    /// Return a copy of `node` with every resolvable reference spliced in.
    pub fn resolve(&mut self, node: &Value) -> Value {
        match node {
            Value::Array(items) => Value::Array(items.iter().map(|v| self.resolve(v)).collect()),
            Value::Object(fields) => Value::Object(self.resolve_object(fields)),
            leaf => leaf.clone(),
        }
    }

    fn resolve_object(&mut self, fields: &Map<String, Value>) -> Map<String, Value> {
        let mut resolved = Map::new();

        for (key, value) in fields {
            if let Some(spliced) = self.expand_reference(key, value) {
                for (k, v) in spliced {
                    resolved.insert(k, v);
                }
                continue;
            }
            resolved.insert(key.clone(), self.resolve(value));
        }

        resolved
    }

    /// Expand `key: value` when it is a reference to a known, non-expanding
    /// object definition. `None` means the pair is kept as an ordinary field.
    fn expand_reference(&mut self, key: &str, value: &Value) -> Option<Map<String, Value>> {
        if !self.ref_keys.contains(&key) {
            return None;
        }
        let name = value.as_str()?;
        let table = self.table;

        let Some(target) = table.get(name) else {
            if key == "$ref" {
                debug!("reference target not found, leaving as-is: {name}");
            }
            return None;
        };
        let Value::Object(definition) = target else {
            return None;
        };
        if self.expanding.contains(name) {
            debug!("circular reference to {name}, leaving unexpanded");
            return None;
        }

        self.expanding.insert(name.to_string());
        let expanded = self.resolve_object(definition);
        self.expanding.remove(name);
        Some(expanded)
    }
}

/// Build a lookup table keyed by JSON pointer, e.g. `#/definitions/Pet`,
/// from named sections of a document.
pub fn pointer_table<'s, P: AsRef<str>>(
    sections: impl IntoIterator<Item = (P, &'s Value)>,
) -> Map<String, Value> {
    let mut table = Map::new();
    for (prefix, section) in sections {
        if let Value::Object(entries) = section {
            for (name, definition) in entries {
                let key = format!("{}{}", prefix.as_ref(), escape_pointer(name));
                table.insert(key, definition.clone());
            }
        }
    }
    table
}

fn escape_pointer(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn table(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_reference_is_spliced() {
        let models = table(json!({"Pet": {"properties": {"name": {"type": "string"}}}}));
        let mut resolver = RefResolver::new(&models);
        let out = resolver.resolve(&json!({"description": "a pet", "$ref": "Pet"}));
        assert_eq!(
            out,
            json!({"description": "a pet", "properties": {"name": {"type": "string"}}})
        );
    }

    #[test]
    fn test_later_keys_override_spliced_keys() {
        let models = table(json!({"Pet": {"description": "from model", "type": "object"}}));
        let mut resolver = RefResolver::new(&models);
        let out = resolver.resolve(&json!({"$ref": "Pet", "description": "local"}));
        assert_eq!(out, json!({"description": "local", "type": "object"}));
    }

    #[test]
    fn test_missing_target_is_left_verbatim() {
        let models = Map::new();
        let mut resolver = RefResolver::new(&models);
        let doc = json!({"schema": {"$ref": "#/definitions/Nope"}});
        assert_eq!(resolver.resolve(&doc), doc);
    }

    #[test]
    fn test_self_reference_terminates() {
        let models = table(json!({
            "Node": {
                "type": "object",
                "properties": {"next": {"$ref": "Node"}}
            }
        }));
        let mut resolver = RefResolver::new(&models);
        let out = resolver.resolve(&json!({"$ref": "Node"}));
        assert_eq!(
            out,
            json!({
                "type": "object",
                "properties": {"next": {"$ref": "Node"}}
            })
        );
    }

    #[test]
    fn test_mutual_reference_terminates() {
        let models = table(json!({
            "A": {"properties": {"b": {"$ref": "B"}}},
            "B": {"properties": {"a": {"$ref": "A"}}}
        }));
        let mut resolver = RefResolver::new(&models);
        let out = resolver.resolve(&json!({"$ref": "A"}));
        assert_eq!(
            out,
            json!({"properties": {"b": {"properties": {"a": {"$ref": "A"}}}}})
        );
    }

    #[test]
    fn test_siblings_expand_independently() {
        let models = table(json!({"Tag": {"type": "object"}}));
        let mut resolver = RefResolver::new(&models);
        let out = resolver.resolve(&json!({
            "first": {"$ref": "Tag"},
            "second": [{"$ref": "Tag"}]
        }));
        assert_eq!(
            out,
            json!({"first": {"type": "object"}, "second": [{"type": "object"}]})
        );
    }

    #[test]
    fn test_legacy_type_is_a_reference() {
        let models = table(json!({"Category": {"id": "Category", "properties": {}}}));

        let mut legacy = RefResolver::legacy(&models);
        let out = legacy.resolve(&json!({"type": "Category"}));
        assert_eq!(out, json!({"id": "Category", "properties": {}}));

        let mut pointer = RefResolver::new(&models);
        let out = pointer.resolve(&json!({"type": "Category"}));
        assert_eq!(out, json!({"type": "Category"}));
    }

    #[test]
    fn test_basic_type_names_pass_through() {
        let models = table(json!({"Pet": {}}));
        let mut resolver = RefResolver::legacy(&models);
        let doc = json!({"type": "string", "items": {"type": "integer"}});
        assert_eq!(resolver.resolve(&doc), doc);
    }

    #[test]
    fn test_pointer_table() {
        let definitions = json!({"Pet": {"type": "object"}, "a/b": {}});
        let parameters = json!({"limit": {"name": "limit"}});
        let table = pointer_table([
            ("#/definitions/", &definitions),
            ("#/parameters/", &parameters),
        ]);
        let keys: Vec<&str> = table.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["#/definitions/Pet", "#/definitions/a~1b", "#/parameters/limit"]
        );
    }
}
