use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};

pub const DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Draft-07 schema an executor validates a request's `{ body, params }`
/// against before dispatching it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationSchema {
    #[serde(rename = "$schema")]
    pub dialect: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "type")]
    pub schema_type: &'static str,

    pub properties: RequestSchemas,
}

impl ValidationSchema {
    /// A schema accepting only an empty body and no params.
    pub fn new(title: Option<String>, description: Option<String>) -> Self {
        Self {
            dialect: DRAFT_07,
            title,
            description,
            schema_type: "object",
            properties: RequestSchemas {
                body: ObjectSchema::closed().into_value(),
                params: ObjectSchema::closed(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSchemas {
    /// Arbitrary fragment taken from the source document, or `{}`.
    pub body: Value,
    pub params: ObjectSchema,
}

/// A closed object schema (`additionalProperties: false`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,

    pub properties: IndexMap<String, Value>,

    pub required: Vec<String>,

    #[serde(rename = "additionalProperties")]
    pub additional_properties: bool,
}

impl ObjectSchema {
    pub fn closed() -> Self {
        Self {
            schema_type: "object",
            properties: IndexMap::new(),
            required: Vec::new(),
            additional_properties: false,
        }
    }

    pub fn into_value(self) -> Value {
        json!({
            "type": self.schema_type,
            "properties": self.properties,
            "required": self.required,
            "additionalProperties": self.additional_properties,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_schema_shape() {
        let schema = ValidationSchema::new(Some("listPets".into()), None);
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "$schema": "http://json-schema.org/draft-07/schema#",
                "title": "listPets",
                "type": "object",
                "properties": {
                    "body": {
                        "type": "object",
                        "properties": {},
                        "required": [],
                        "additionalProperties": false
                    },
                    "params": {
                        "type": "object",
                        "properties": {},
                        "required": [],
                        "additionalProperties": false
                    }
                }
            })
        );
    }

    #[test]
    fn test_closed_object_round_trips_to_value() {
        let mut params = ObjectSchema::closed();
        params.properties.insert("limit".into(), json!({"type": "integer"}));
        params.required.push("limit".into());
        assert_eq!(serde_json::to_value(&params).unwrap(), params.clone().into_value());
    }
}
