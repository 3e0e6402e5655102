use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Swagger 2.0 document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SwaggerSpec {
    pub schemes: Vec<String>,
    pub host: String,

    #[serde(rename = "basePath")]
    pub base_path: String,

    pub consumes: Vec<String>,

    /// Kept untyped until definitions have been spliced in.
    pub paths: Map<String, Value>,

    pub definitions: Value,
    pub parameters: Value,
    pub responses: Value,
}

/// A path item, containing operations keyed by HTTP method.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PathItem {
    pub parameters: Vec<Parameter>,

    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
}

impl PathItem {
    /// Operations in method order, paired with their lowercase method name.
    pub fn operations(&self) -> Vec<(&'static str, &Operation)> {
        [
            ("get", &self.get),
            ("put", &self.put),
            ("post", &self.post),
            ("delete", &self.delete),
            ("options", &self.options),
            ("head", &self.head),
            ("patch", &self.patch),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,

    pub summary: Option<String>,
    pub description: Option<String>,
    pub consumes: Vec<String>,
    pub parameters: Vec<Parameter>,
}

/// An operation parameter. Everything besides the identifying fields is
/// schema material and lands in `fields`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameter {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "in", default)]
    pub location: String,

    #[serde(default)]
    pub required: bool,

    #[serde(flatten)]
    pub fields: IndexMap<String, Value>,
}
