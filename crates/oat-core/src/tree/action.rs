use indexmap::IndexMap;
use serde::Serialize;
use serde::ser::{SerializeSeq, Serializer};

use super::schema::ValidationSchema;

/// One endpoint, serialized as `[pathTemplate, requestDefaults, schema]`.
///
/// Without a schema the triplet degenerates to `[pathTemplate, requestDefaults]`,
/// which tells the executor to skip client-side validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub path_template: String,
    pub defaults: RequestDefaults,
    pub schema: Option<ValidationSchema>,
}

impl Action {
    pub fn method(&self) -> &str {
        &self.defaults.method
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.schema.is_some() { 3 } else { 2 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.path_template)?;
        seq.serialize_element(&self.defaults)?;
        if let Some(schema) = &self.schema {
            seq.serialize_element(schema)?;
        }
        seq.end()
    }
}

/// Request options the executor starts from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDefaults {
    /// Uppercase HTTP method.
    pub method: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
}

impl RequestDefaults {
    pub fn new(method: &str, content_type: Option<&str>) -> Self {
        let headers = content_type.map(|ct| {
            let mut headers = IndexMap::new();
            headers.insert("Content-Type".to_string(), ct.to_string());
            headers
        });
        Self {
            method: method.to_uppercase(),
            headers,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get("Content-Type"))
            .map(String::as_str)
    }
}
