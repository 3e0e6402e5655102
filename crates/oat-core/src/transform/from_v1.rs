//! Swagger 1.2 pipeline: flatten model inheritance, splice models, then
//! build one action per declared operation.

use log::{debug, trace};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::ConvertOptions;
use super::path_template::{literal_segments, strip_resource_path, to_path_template};
use super::schema_synth::{
    ParamKind, build_action, checked, effective_consumes, insert_param, is_truthy, set_body,
};
use crate::error::ConvertError;
use crate::parse::inheritance::flatten_inheritance;
use crate::parse::ref_resolve::RefResolver;
use crate::parse::v1::{Api, ApiDeclaration, Operation};
use crate::tree::{Action, ApiTreeSchema, PathNode, ValidationSchema};

/// Parameter keys that describe the parameter itself rather than its value.
const NON_SCHEMA_KEYS: &[&str] = &[
    "name",
    "paramType",
    "required",
    "id",
    "subTypes",
    "default",
    "allowMultiple",
    "discriminator",
];

pub fn convert(document: &Value, options: &ConvertOptions) -> Result<ApiTreeSchema, ConvertError> {
    let declaration = ApiDeclaration::deserialize(document)?;
    let models = flatten_inheritance(&declaration.models);
    let mut resolver = RefResolver::legacy(&models);
    let mut tree = PathNode::default();

    for raw in &declaration.apis {
        let api = Api::deserialize(&resolver.resolve(raw))?;
        let pathname = strip_resource_path(&declaration.resource_path, &api.path);
        let template = to_path_template(pathname);
        let leaf = tree.ensure_path(literal_segments(pathname));

        for operation in &api.operations {
            if operation.method.is_empty() {
                debug!("skipping operation without a method on {}", api.path);
                continue;
            }
            let action = convert_operation(&template, operation, &declaration.consumes, options);
            trace!("{} {}", action.method(), action.path_template);
            leaf.insert_action(&operation.method.to_lowercase(), action);
        }
    }

    Ok(ApiTreeSchema {
        base: join_base(&declaration.base_path, &declaration.resource_path),
        tree,
    })
}

fn convert_operation(
    template: &str,
    operation: &Operation,
    document_consumes: &[String],
    options: &ConvertOptions,
) -> Action {
    let content_type = effective_consumes(&operation.consumes, document_consumes)
        .first()
        .map(String::as_str);
    let schema = options.validation.then(|| synthesize(operation));

    build_action(template, &operation.method, content_type, schema)
}

fn synthesize(operation: &Operation) -> ValidationSchema {
    let mut schema = ValidationSchema::new(operation.nickname.clone(), operation.summary.clone());

    for parameter in &operation.parameters {
        let kind = ParamKind::classify(str_field(parameter, "paramType"));
        match kind {
            ParamKind::Body | ParamKind::FormData => {
                set_body(&mut schema, kind, to_fragment(parameter));
            }
            ParamKind::Params => {
                let required = parameter.get("required").is_some_and(is_truthy);
                insert_param(
                    &mut schema,
                    str_field(parameter, "name"),
                    checked(to_fragment(parameter)),
                    required,
                );
            }
        }
    }

    schema
}

/// The parameter as a schema fragment. `required` is always dropped, whether
/// it is the parameter flag or a list spliced in from a body model.
fn to_fragment(parameter: &Map<String, Value>) -> Map<String, Value> {
    parameter
        .iter()
        .filter(|(key, _)| !NON_SCHEMA_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn str_field<'m>(parameter: &'m Map<String, Value>, key: &str) -> &'m str {
    parameter.get(key).and_then(Value::as_str).unwrap_or_default()
}

/// `basePath` without trailing slashes, followed by the resource path.
fn join_base(base_path: &str, resource_path: &str) -> String {
    format!("{}{}", base_path.trim_end_matches('/'), resource_path)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn declaration(apis: Value, models: Value) -> Value {
        json!({
            "swaggerVersion": "1.2",
            "basePath": "http://petstore.swagger.wordnik.com/api/",
            "resourcePath": "/pet",
            "apis": apis,
            "models": models
        })
    }

    #[test]
    fn test_join_base() {
        assert_eq!(join_base("http://host/api/", "/pet"), "http://host/api/pet");
        assert_eq!(join_base("http://host/api//", ""), "http://host/api");
        assert_eq!(join_base("", "/pet"), "/pet");
    }

    #[test]
    fn test_body_model_is_spliced_and_flattened() {
        let doc = declaration(
            json!([{
                "path": "/pet",
                "operations": [{
                    "method": "POST",
                    "nickname": "addPet",
                    "summary": "Add a new pet",
                    "parameters": [{
                        "name": "body",
                        "description": "Pet object that needs to be added to the store",
                        "required": true,
                        "type": "Dog",
                        "paramType": "body"
                    }]
                }]
            }]),
            json!({
                "Animal": {
                    "id": "Animal",
                    "required": ["name"],
                    "properties": {"name": {"type": "string"}},
                    "subTypes": ["Dog"],
                    "discriminator": "kind"
                },
                "Dog": {
                    "id": "Dog",
                    "properties": {"breed": {"type": "string"}}
                }
            }),
        );
        let result = convert(&doc, &ConvertOptions::default()).unwrap();
        let action = &result.tree.method("post").unwrap().actions()[0];

        assert_eq!(action.path_template, "");
        let schema = action.schema.as_ref().unwrap();
        assert_eq!(schema.title.as_deref(), Some("addPet"));
        assert_eq!(schema.description.as_deref(), Some("Add a new pet"));
        assert_eq!(
            schema.properties.body,
            json!({
                "description": "Pet object that needs to be added to the store",
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "breed": {"type": "string"}
                }
            })
        );
    }

    #[test]
    fn test_params_and_unknown_types() {
        let doc = declaration(
            json!([{
                "path": "/pet/{petId}/uploadImage",
                "operations": [{
                    "method": "POST",
                    "nickname": "uploadFile",
                    "consumes": ["multipart/form-data"],
                    "parameters": [
                        {"name": "petId", "paramType": "path", "type": "integer", "format": "int64", "required": true},
                        {"name": "verbose", "paramType": "query", "type": "boolean", "allowMultiple": false},
                        {"name": "file", "paramType": "formData", "type": "File"}
                    ]
                }]
            }]),
            json!({}),
        );
        let result = convert(&doc, &ConvertOptions::default()).unwrap();
        let action = &result
            .tree
            .child("uploadImage")
            .unwrap()
            .method("post")
            .unwrap()
            .actions()[0];

        assert_eq!(action.path_template, "/:petId/uploadImage");
        assert_eq!(action.defaults.content_type(), Some("multipart/form-data"));
        let schema = action.schema.as_ref().unwrap();
        assert_eq!(schema.properties.body, json!({}));
        assert_eq!(schema.properties.params.required, vec!["petId".to_string()]);
        assert_eq!(
            schema.properties.params.properties["petId"],
            json!({"type": "integer", "format": "int64"})
        );
        assert_eq!(
            schema.properties.params.properties["verbose"],
            json!({"type": "boolean"})
        );
    }

    #[test]
    fn test_body_ignores_required_regardless_of_key_order() {
        let models = json!({
            "Pet": {"id": "Pet", "required": ["name"], "properties": {"name": {"type": "string"}}}
        });
        let body_for = |parameter: Value| {
            let doc = declaration(
                json!([{"path": "/pet", "operations": [{"method": "POST", "parameters": [parameter]}]}]),
                models.clone(),
            );
            let result = convert(&doc, &ConvertOptions::default()).unwrap();
            let action = &result.tree.method("post").unwrap().actions()[0];
            action.schema.as_ref().unwrap().properties.body.clone()
        };

        let flag_first = body_for(json!({"paramType": "body", "required": true, "type": "Pet"}));
        let flag_last = body_for(json!({"paramType": "body", "type": "Pet", "required": true}));

        let expected = json!({"type": "object", "properties": {"name": {"type": "string"}}});
        assert_eq!(flag_first, expected);
        assert_eq!(flag_last, expected);
    }

    #[test]
    fn test_document_consumes_fallback() {
        let mut doc = declaration(
            json!([{"path": "/pet", "operations": [{"method": "PUT", "nickname": "updatePet"}]}]),
            json!({}),
        );
        doc["consumes"] = json!(["application/json", "application/xml"]);
        let result = convert(&doc, &ConvertOptions { validation: false }).unwrap();
        let action = &result.tree.method("put").unwrap().actions()[0];
        assert_eq!(action.defaults.content_type(), Some("application/json"));
        assert!(action.schema.is_none());
    }
}
