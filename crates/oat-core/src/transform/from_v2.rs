//! Swagger 2.0 pipeline.

use log::{debug, trace};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::ConvertOptions;
use super::path_template::{is_path_key, literal_segments, to_path_template};
use super::schema_synth::{
    ParamKind, build_action, checked, effective_consumes, insert_param, is_json_media_type,
    merge_parameters, permissive, set_body,
};
use crate::error::ConvertError;
use crate::parse::ref_resolve::{RefResolver, pointer_table};
use crate::parse::v2::{Operation, Parameter, PathItem, SwaggerSpec};
use crate::tree::{ApiTreeSchema, PathNode, ValidationSchema};

const DEFAULT_SCHEME: &str = "https";

pub fn convert(document: &Value, options: &ConvertOptions) -> Result<ApiTreeSchema, ConvertError> {
    let spec = SwaggerSpec::deserialize(document)?;
    let table = pointer_table([
        ("#/definitions/", &spec.definitions),
        ("#/parameters/", &spec.parameters),
        ("#/responses/", &spec.responses),
    ]);
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
            let consumes = effective_consumes(&operation.consumes, &spec.consumes);
            let content_type = consumes.first().map(String::as_str);
            let schema = options
                .validation
                .then(|| synthesize(operation, &parameters, consumes));

            let action = build_action(&template, method, content_type, schema);
            trace!("{} {}", action.method(), action.path_template);
            leaf.insert_action(method, action);
        }
    }

    Ok(ApiTreeSchema {
        base: base_url(&spec),
        tree,
    })
}

fn synthesize(operation: &Operation, parameters: &[&Parameter], consumes: &[String]) -> ValidationSchema {
    let description = operation
        .description
        .clone()
        .or_else(|| operation.summary.clone());
    let mut schema = ValidationSchema::new(operation.operation_id.clone(), description);
    let json_body = accepts_json_body(consumes);

    for parameter in parameters {
        let kind = ParamKind::classify(&parameter.location);
        match kind {
            ParamKind::Body | ParamKind::FormData if json_body => {
                set_body(&mut schema, kind, to_fragment(parameter));
            }
            ParamKind::Body | ParamKind::FormData => {
                schema.properties.body = permissive();
            }
            ParamKind::Params => {
                insert_param(
                    &mut schema,
                    &parameter.name,
                    checked(to_fragment(parameter)),
                    parameter.required,
                );
            }
        }
    }

    schema
}

/// Bodies are only checked when the operation consumes nothing but JSON.
fn accepts_json_body(consumes: &[String]) -> bool {
    match consumes {
        [] => true,
        [single] => is_json_media_type(single),
        _ => false,
    }
}

/// The parameter's own fields with its nested `schema` merged over them.
fn to_fragment(parameter: &Parameter) -> Map<String, Value> {
    let mut fragment: Map<String, Value> = parameter
        .fields
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "collectionFormat" | "schema"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if let Some(Value::Object(schema)) = parameter.fields.get("schema") {
        for (key, value) in schema {
            fragment.insert(key.clone(), value.clone());
        }
    }

    fragment
}

/// `scheme://host + basePath`, using the first declared scheme.
fn base_url(spec: &SwaggerSpec) -> String {
    let scheme = spec.schemes.first().map_or(DEFAULT_SCHEME, String::as_str);
    format!("{scheme}://{}{}", spec.host, spec.base_path)
}
