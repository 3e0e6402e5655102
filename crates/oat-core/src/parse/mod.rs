pub mod inheritance;
pub mod ref_resolve;
pub mod v1;
pub mod v2;
pub mod v3;

use std::fmt;

use serde_json::Value;

use crate::error::ParseError;

/// Parse an API description document from YAML.
pub fn from_yaml(input: &str) -> Result<Value, ParseError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Parse an API description document from JSON.
pub fn from_json(input: &str) -> Result<Value, ParseError> {
    Ok(serde_json::from_str(input)?)
}

/// The document formats the converter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// Swagger 1.2 resource listing (`swaggerVersion: "1.2"`).
    Swagger12,
    /// Swagger 2.0 (`swagger: "2.0"`).
    Swagger20,
    /// OpenAPI 3.0.x (`openapi: "3.0.x"`).
    OpenApi30,
}

impl Dialect {
    /// Inspect the version markers of a document, in priority order.
    pub fn detect(document: &Value) -> Option<Dialect> {
        let marker = |key: &str| document.get(key).and_then(Value::as_str).unwrap_or("");

        if marker("swaggerVersion") == "1.2" {
            Some(Dialect::Swagger12)
        } else if marker("swagger") == "2.0" {
            Some(Dialect::Swagger20)
        } else if is_openapi_30(marker("openapi")) {
            Some(Dialect::OpenApi30)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Swagger12 => "swagger 1.2",
            Dialect::Swagger20 => "swagger 2.0",
            Dialect::OpenApi30 => "openapi 3.0",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `3.0.<patch>` where the patch part is non-empty and has no further dots.
fn is_openapi_30(version: &str) -> bool {
    version
        .strip_prefix("3.0.")
        .is_some_and(|patch| !patch.is_empty() && !patch.contains('.'))
}
