use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConvertError {
    /// No version marker matched a supported dialect.
    #[error("unsupported schema")]
    UnsupportedSchema,

    /// The version marker matched but the document body has the wrong shape.
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}
