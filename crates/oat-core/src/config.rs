use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::transform::ConvertOptions;

/// Project configuration loaded from `.open-api-tree.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OatConfig {
    pub input: String,
    /// Write the tree here instead of stdout.
    pub output: Option<String>,
    pub format: OutputFormat,
    pub pretty: bool,
    pub validation: bool,
}

impl Default for OatConfig {
    fn default() -> Self {
        Self {
            input: "openapi.yaml".to_string(),
            output: None,
            format: OutputFormat::Json,
            pretty: true,
            validation: true,
        }
    }
}

impl OatConfig {
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            validation: self.validation,
        }
    }
}

/// Serialization of the converted tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".open-api-tree.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OatConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: OatConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# open-api-tree configuration
input: openapi.yaml     # swagger 1.2, swagger 2.0 or openapi 3.0.x (.json or .yaml)
# output: api-tree.json # defaults to stdout
format: json            # json | yaml
pretty: true
validation: true        # attach a draft-07 schema to every action
"#
}
