// Command line interface: serve the MCP tools or use the catalog directly.

use crate::error::ManifestError;
use crate::tools;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "k8s-manifest-mcp")]
#[command(version)]
#[command(about = "Render Kubernetes CRD manifests from typed configuration", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log filter (tracing EnvFilter syntax); logs go to stderr
    #[arg(long, global = true, env = "K8S_MANIFEST_LOG", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Serve the manifest tools over MCP stdio (default)
    Serve,

    /// List manifest data sources
    List,

    /// Show the configuration schema of a data source
    Describe {
        /// Data source name, e.g. temporal_io_temporal_cluster_v1beta1_manifest
        data_source: String,
    },

    /// Validate a configuration and print the rendered manifest
    Render {
        /// Data source name
        data_source: String,

        /// Configuration file, JSON or YAML (default: stdin)
        #[arg(short = 'f', long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// The manifest YAML only
    Yaml,
    /// `{"id", "yaml"}` as JSON
    Json,
}

/// Runs a non-serving subcommand and returns what to print on stdout.
pub fn run_offline(command: &Commands) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    match command {
        Commands::Serve => Err("serve is handled by the MCP server".into()),
        Commands::List => Ok(tools::reference::list_data_sources_json()),
        Commands::Describe { data_source } => Ok(tools::reference::describe_data_source_json(data_source)?),
        Commands::Render {
            data_source,
            config,
            output,
        } => {
            let text = match config {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            render(data_source, &text, *output).map_err(Into::into)
        }
    }
}

pub fn render(data_source: &str, config: &str, output: OutputFormat) -> Result<String, ManifestError> {
    let resolved = tools::manifest::resolve_manifest(data_source, config)?;
    Ok(match output {
        OutputFormat::Yaml => resolved.yaml,
        OutputFormat::Json => {
            serde_json::to_string_pretty(&resolved).unwrap_or_else(|_| resolved.yaml.clone())
        }
    })
}
