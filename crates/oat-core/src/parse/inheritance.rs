use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Flatten Swagger 1.2 model inheritance.
///
/// Parents list their children under `subTypes`. Every model receives the
/// `required` entries (concatenated, duplicates kept) and `properties`
/// (shallow merge, child wins) of all of its ancestors. `subTypes` and
/// `discriminator` are stripped from every model. The input is not modified.
pub fn flatten_inheritance(models: &Map<String, Value>) -> Map<String, Value> {
    let mut stripped = models.clone();
    let mut parents: IndexMap<String, Vec<String>> = IndexMap::new();

    for (name, model) in stripped.iter_mut() {
        let Value::Object(fields) = model else {
            continue;
        };
        if let Some(Value::Array(sub_types)) = fields.remove("subTypes") {
            for child in sub_types.iter().filter_map(Value::as_str) {
                parents.entry(child.to_string()).or_default().push(name.clone());
            }
        }
        fields.remove("discriminator");
    }

    stripped
        .iter()
        .map(|(name, model)| {
            let chain = parents.get(name).map(Vec::as_slice).unwrap_or_default();
            if chain.is_empty() {
                return (name.clone(), model.clone());
            }
            let mut visited = HashSet::from([name.as_str()]);
            let mut flat = model.clone();
            if let Value::Object(fields) = &mut flat {
                inherit(fields, chain, &stripped, &parents, &mut visited);
            }
            (name.clone(), flat)
        })
        .collect()
}

fn inherit<'m>(
    model: &mut Map<String, Value>,
    chain: &'m [String],
    models: &'m Map<String, Value>,
    parents: &'m IndexMap<String, Vec<String>>,
    visited: &mut HashSet<&'m str>,
) {
    for parent_name in chain {
        if !visited.insert(parent_name.as_str()) {
            continue;
        }
        let parent = models.get(parent_name).and_then(Value::as_object);

        let mut required = take_array(model, "required");
        if let Some(Value::Array(inherited)) = parent.and_then(|p| p.get("required")) {
            required.extend(inherited.iter().cloned());
        }
        model.insert("required".to_string(), Value::Array(required));

        let mut properties = parent
            .and_then(|p| p.get("properties"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        if let Some(Value::Object(own)) = model.remove("properties") {
            for (key, value) in own {
                properties.insert(key, value);
            }
        }
        model.insert("properties".to_string(), Value::Object(properties));

        if let Some(grandparents) = parents.get(parent_name) {
            inherit(model, grandparents, models, parents, visited);
        }
        visited.remove(parent_name.as_str());
    }
}

fn take_array(model: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match model.remove(key) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    }
}
