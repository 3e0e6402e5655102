//! OpenAPI 3.0 pipeline.

use log::{debug, trace};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::ConvertOptions;
use super::path_template::{is_path_key, literal_segments, to_path_template};
use super::schema_synth::{
    build_action, checked, insert_param, is_json_media_type, merge_parameters, permissive,
};
use crate::error::ConvertError;
use crate::parse::ref_resolve::{RefResolver, pointer_table};
use crate::parse::v3::{OpenApiSpec, Operation, Parameter, PathItem, RequestBody};
use crate::tree::{ApiTreeSchema, PathNode, ValidationSchema};

pub fn convert(document: &Value, options: &ConvertOptions) -> Result<ApiTreeSchema, ConvertError> {
    let spec = OpenApiSpec::deserialize(document)?;
    let table = pointer_table(
        spec.components
            .iter()
            .map(|(section, entries)| (format!("#/components/{section}/"), entries)),
    );
    let mut resolver = RefResolver::new(&table);
    let mut tree = PathNode::default();

    for (pathname, raw) in &spec.paths {
        if !is_path_key(pathname) {
            debug!("skipping non-path key {pathname}");
            continue;
        }
        let item = PathItem::deserialize(&resolver.resolve(raw))?;
        let template = to_path_template(pathname);
        let leaf = tree.ensure_path(literal_segments(pathname));

        for (method, operation) in item.operations() {
            let parameters = merge_parameters(&item.parameters, &operation.parameters, |p| {
                (p.name.as_str(), p.location.as_str())
            });
            let content_type = operation
                .request_body
                .as_ref()
                .and_then(|body| body.content.keys().next())
                .map(String::as_str);
            let schema = options
                .validation
                .then(|| synthesize(operation, &parameters));

            let action = build_action(&template, method, content_type, schema);
            trace!("{} {}", action.method(), action.path_template);
            leaf.insert_action(method, action);
        }
    }

    let base = spec
        .servers
        .first()
        .map(|server| server.url.clone())
        .unwrap_or_default();

    Ok(ApiTreeSchema { base, tree })
}

fn synthesize(operation: &Operation, parameters: &[&Parameter]) -> ValidationSchema {
    let description = operation
        .description
        .clone()
        .or_else(|| operation.summary.clone());
    let mut schema = ValidationSchema::new(operation.operation_id.clone(), description);

    for parameter in parameters {
        insert_param(
            &mut schema,
            &parameter.name,
            checked(param_fragment(parameter)),
            parameter.required,
        );
    }
    if let Some(body) = operation.request_body.as_ref().and_then(body_schema) {
        schema.properties.body = body;
    }

    schema
}

fn param_fragment(parameter: &Parameter) -> Map<String, Value> {
    let mut fragment = Map::new();
    if let Some(description) = &parameter.description {
        fragment.insert("description".to_string(), Value::String(description.clone()));
    }
    for (key, value) in parameter.schema.iter().flatten() {
        fragment.insert(key.clone(), value.clone());
    }
    fragment
}

/// The schema checked against a request body. `None` keeps the closed
/// default, used when the body declares no content at all.
fn body_schema(body: &RequestBody) -> Option<Value> {
    let mut media_types = body.content.iter();
    let (media_type, content) = media_types.next()?;

    if media_types.next().is_some() {
        debug!("request body offers {} media types, not checking it", body.content.len());
        return Some(permissive());
    }
    if !is_json_media_type(media_type) {
        return Some(permissive());
    }

    let Some(Value::Object(fragment)) = &content.schema else {
        return Some(permissive());
    };
    let mut fragment = fragment.clone();
    if fragment.contains_key("properties") && !fragment.contains_key("type") {
        fragment.insert("type".to_string(), Value::String("object".to_string()));
    }
    Some(checked(fragment))
}
