use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::info;
use serde_json::Value;

use oat_core::ApiTreeSchema;
use oat_core::config::{self, CONFIG_FILE_NAME, OatConfig, OutputFormat};
use oat_core::parse::{self, Dialect};
use oat_core::transform;

#[derive(Parser)]
#[command(name = "oat", about = "Convert Swagger/OpenAPI documents into api route trees", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Swagger 1.2, Swagger 2.0 or OpenAPI 3.0 document
    Convert {
        /// Path to the API document (YAML or JSON)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Write the tree to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long)]
        format: Option<Format>,

        /// Leave validation schemas out of every action
        #[arg(long)]
        no_validation: bool,
    },

    /// List the routes a document converts to
    Inspect {
        /// Path to the API document
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: Format,
    },

    /// Initialize a new oat configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => Format::Json,
            OutputFormat::Yaml => Format::Yaml,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            no_validation,
        } => cmd_convert(input, output, format, no_validation),

        Commands::Inspect { input, format } => cmd_inspect(input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "oat", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<OatConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

fn load_document(path: &Path) -> Result<Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let document = match ext {
        "json" => parse::from_json(&content)?,
        _ => parse::from_yaml(&content)?,
    };
    Ok(document)
}

fn render(value: &Value, format: Format, pretty: bool) -> Result<String> {
    let rendered = match format {
        Format::Json if pretty => serde_json::to_string_pretty(value)? + "\n",
        Format::Json => serde_json::to_string(value)? + "\n",
        Format::Yaml => serde_yaml_ng::to_string(value)?,
    };
    Ok(rendered)
}

fn cmd_convert(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<Format>,
    no_validation: bool,
) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let input = input.unwrap_or_else(|| PathBuf::from(&cfg.input));
    let output = output.or_else(|| cfg.output.as_ref().map(PathBuf::from));
    let format = format.unwrap_or_else(|| cfg.format.into());

    let mut options = cfg.convert_options();
    if no_validation {
        options.validation = false;
    }

    let document = load_document(&input)?;
    let tree = transform::transform_with_options(&document, &options)
        .with_context(|| format!("failed to convert {}", input.display()))?;
    info!("converted {} operations from {}", tree.operation_count(), input.display());

    let rendered = render(&serde_json::to_value(&tree)?, format, cfg.pretty)?;
    match output {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("  wrote {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_inspect(input: PathBuf, format: Format) -> Result<()> {
    let document = load_document(&input)?;
    let dialect = Dialect::detect(&document)
        .with_context(|| format!("{} is not a supported API document", input.display()))?;
    let tree = transform::transform(&document)?;

    let summary = build_inspect_summary(dialect, &tree);
    print!("{}", render(&summary, format, true)?);
    Ok(())
}

fn build_inspect_summary(dialect: Dialect, tree: &ApiTreeSchema) -> Value {
    let routes: Vec<String> = tree
        .routes()
        .iter()
        .map(|route| format!("{} {}", route.action.method(), route.action.path_template))
        .collect();

    serde_json::json!({
        "dialect": dialect.as_str(),
        "base": tree.base,
        "operations": routes.len(),
        "routes": routes,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
