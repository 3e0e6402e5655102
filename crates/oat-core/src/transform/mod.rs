pub mod from_v1;
pub mod from_v2;
pub mod from_v3;
pub mod path_template;
pub mod schema_synth;

use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConvertError;
use crate::parse::Dialect;
use crate::tree::ApiTreeSchema;

/// Modifiers for the conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Attach a JSON Schema to every action for client-side validation.
    pub validation: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { validation: true }
    }
}

/// A dialect-specific conversion pipeline.
pub type Pipeline = fn(&Value, &ConvertOptions) -> Result<ApiTreeSchema, ConvertError>;

impl Dialect {
    pub fn pipeline(self) -> Pipeline {
        match self {
            Dialect::Swagger12 => from_v1::convert,
            Dialect::Swagger20 => from_v2::convert,
            Dialect::OpenApi30 => from_v3::convert,
        }
    }
}

/// Convert an API description document into an api route tree.
pub fn transform(document: &Value) -> Result<ApiTreeSchema, ConvertError> {
    transform_with_options(document, &ConvertOptions::default())
}

/// Convert with explicit options.
pub fn transform_with_options(
    document: &Value,
    options: &ConvertOptions,
) -> Result<ApiTreeSchema, ConvertError> {
    let dialect = Dialect::detect(document).ok_or(ConvertError::UnsupportedSchema)?;
    debug!("converting {dialect} document (validation: {})", options.validation);
    dialect.pipeline()(document, options)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_unsupported_schema() {
        let err = transform(&json!({"info": {"title": "nothing"}})).unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedSchema));
        assert_eq!(err.to_string(), "unsupported schema");
    }

    #[test]
    fn test_options_default_to_validation() {
        assert!(ConvertOptions::default().validation);
        let options: ConvertOptions = serde_json::from_value(json!({})).unwrap();
        assert!(options.validation);
        let options: ConvertOptions = serde_json::from_value(json!({"validation": false})).unwrap();
        assert!(!options.validation);
    }

    #[test]
    fn test_malformed_recognized_document() {
        let err = transform(&json!({"swagger": "2.0", "paths": ["/pets"]})).unwrap_err();
        assert!(matches!(err, ConvertError::Malformed(_)));
    }
}
