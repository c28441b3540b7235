//! n8n chart values generator
//!
//! Reads a typed app-inputs document and a platform catalog, validates the
//! inputs eagerly, and emits the values document consumed by the n8n Helm
//! chart. Generation is all-or-nothing: on any failure nothing is written.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use uuid::Uuid;

use n8n_values::config::{AppInputs, DatabaseSelection};
use n8n_values::db;
use n8n_values::platform::CatalogPlatform;
use n8n_values::secrets::RandomKeySource;
use n8n_values::values::{DeploymentRequest, ValuesGenerator};

#[derive(Parser, Debug)]
#[command(name = "n8n-values")]
#[command(
    about = "Helm values generator for n8n deployments",
    long_about = "Translates an app-inputs document into the values consumed by the n8n Helm chart.\n\n\
    Preset resolution and cluster ingress settings come from a platform catalog file."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the chart values document
    Generate {
        /// Path to the app-inputs YAML file
        #[arg(long, env = "N8N_INPUTS_PATH")]
        inputs: PathBuf,

        /// Path to the platform catalog YAML file
        #[arg(long, env = "N8N_PLATFORM_PATH")]
        platform: PathBuf,

        /// Deployment app id (generated when omitted)
        #[arg(long)]
        app_id: Option<String>,

        /// Application instance name
        #[arg(long, default_value = "n8n-app")]
        app_name: String,

        /// Target namespace
        #[arg(long, default_value = "default")]
        namespace: String,

        /// Kubernetes secret holding the referenced app secrets
        #[arg(long, default_value = "apps-secrets")]
        secrets_name: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate an app-inputs document without generating values
    Check {
        /// Path to the app-inputs YAML file
        #[arg(long, env = "N8N_INPUTS_PATH")]
        inputs: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with sensible defaults
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG").unwrap_or_else(|_| "n8n_values=info".to_string()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            inputs,
            platform,
            app_id,
            app_name,
            namespace,
            secrets_name,
            format,
            output,
        } => {
            handle_generate(GenerateArgs {
                inputs,
                platform,
                app_id,
                app_name,
                namespace,
                secrets_name,
                format,
                output,
            })
            .await
        }
        Commands::Check { inputs } => handle_check(&inputs),
    };

    if let Err(ref e) = result {
        tracing::error!("Values generation failed: {:#}", e);
    }

    result
}

struct GenerateArgs {
    inputs: PathBuf,
    platform: PathBuf,
    app_id: Option<String>,
    app_name: String,
    namespace: String,
    secrets_name: String,
    format: OutputFormat,
    output: Option<PathBuf>,
}

async fn handle_generate(args: GenerateArgs) -> Result<()> {
    let inputs = load_inputs(&args.inputs)?;
    let platform = CatalogPlatform::from_file(&args.platform)?;

    let app_id = args
        .app_id
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let request = DeploymentRequest {
        app_name: &args.app_name,
        namespace: &args.namespace,
        app_id: &app_id,
        secrets_name: &args.secrets_name,
    };
    let generator = ValuesGenerator::new(&platform, &RandomKeySource);
    let values = generator
        .generate(&inputs, &request)
        .await
        .context("Chart values generation failed")?;

    let rendered = match args.format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(&values).context("Failed to render values as YAML")?
        }
        OutputFormat::Json => {
            let mut rendered = serde_json::to_string_pretty(&values)
                .context("Failed to render values as JSON")?;
            rendered.push('\n');
            rendered
        }
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write values to: {}", path.display()))?;
            info!("Wrote chart values to: {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn handle_check(path: &Path) -> Result<()> {
    let inputs = load_inputs(path)?;

    // Surface a malformed pooler URI early; the reference may also be an
    // opaque secret key, in which case there is nothing to parse.
    if let DatabaseSelection::Postgres { credentials } = &inputs.database_config.database {
        if let Some(uri) = &credentials.pgbouncer_uri {
            if uri.key.contains("://") {
                match db::parse_connection_uri(&uri.key) {
                    Ok(parts) => info!(
                        "pgbouncer URI resolves to {}:{}/{}",
                        parts.host, parts.port, parts.database
                    ),
                    Err(e) => warn!("pgbouncer URI does not parse: {e}"),
                }
            }
        }
    }

    info!("App inputs are valid");
    Ok(())
}

fn load_inputs(path: &Path) -> Result<AppInputs> {
    info!("Loading app inputs from: {}", path.display());

    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read app-inputs file: {}. Ensure the file exists and is readable.",
            path.display()
        )
    })?;

    let inputs: AppInputs = serde_yaml::from_str(&content).with_context(|| {
        format!(
            "Failed to parse app-inputs file: {}. Ensure the YAML is valid.",
            path.display()
        )
    })?;

    inputs.validate()?;
    Ok(inputs)
}
