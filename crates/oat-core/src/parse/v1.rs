use serde::Deserialize;
use serde_json::{Map, Value};

/// Swagger 1.2 API declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiDeclaration {
    #[serde(rename = "basePath")]
    pub base_path: String,

    #[serde(rename = "resourcePath")]
    pub resource_path: String,

    /// Kept untyped until models have been spliced in.
    pub apis: Vec<Value>,

    pub models: Map<String, Value>,

    pub consumes: Vec<String>,
}

/// One path of an API declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Api {
    pub path: String,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Operation {
    pub method: String,
    pub nickname: Option<String>,
    pub summary: Option<String>,
    pub consumes: Vec<String>,

    /// Parameters double as schema fragments, so they stay untyped.
    pub parameters: Vec<Map<String, Value>>,
}
