//! Kubernetes manifest MCP server: validate CRD configurations and render YAML manifests.

mod catalog;
mod cli;
mod error;
mod schema;
mod tools;
mod types;
mod validation;

use clap::Parser;
use cli::{Cli, Commands};
use rmcp::{
    handler::server::ServerHandler,
    model::{CallToolResult, Content},
    tool, tool_handler, tool_router,
    transport::stdio,
    ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ResolveParams {
    /// Data source name: <group>_<kind>_<version>_manifest
    data_source: String,
    /// Configuration as JSON or YAML: {"metadata": {...}, "spec": {...}}
    config: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct DescribeParams {
    /// Data source name: <group>_<kind>_<version>_manifest
    data_source: String,
}

#[derive(Clone)]
struct ManifestMcpService {
    tool_router: rmcp::handler::server::tool::ToolRouter<Self>,
}

#[tool_router]
impl ManifestMcpService {
    fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Render a Kubernetes manifest for a CRD data source; returns JSON with the yaml (and id when the data source computes one)")]
    async fn resolve_manifest(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<ResolveParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let p = params.0;
        match tools::manifest::resolve_manifest(&p.data_source, &p.config) {
            Ok(out) => {
                let body = serde_json::to_string_pretty(&out).unwrap_or_else(|_| out.yaml.clone());
                Ok(CallToolResult::success(vec![Content::text(body)]))
            }
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }

    #[tool(description = "Validate a configuration against a CRD data source without rendering it")]
    async fn validate_manifest_config(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<ResolveParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        let p = params.0;
        match tools::manifest::validate_manifest_config(&p.data_source, &p.config) {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text("Configuration is valid.")])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }

    #[tool(description = "List manifest data sources with their apiVersion and kind")]
    async fn list_manifest_data_sources(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        let out = tools::reference::list_data_sources_json();
        Ok(CallToolResult::success(vec![Content::text(out)]))
    }

    #[tool(description = "Describe the configuration schema (metadata and spec fields) of a manifest data source")]
    async fn describe_manifest_data_source(
        &self,
        params: rmcp::handler::server::wrapper::Parameters<DescribeParams>,
    ) -> Result<CallToolResult, rmcp::ErrorData> {
        match tools::reference::describe_data_source_json(&params.0.data_source) {
            Ok(out) => Ok(CallToolResult::success(vec![Content::text(out)])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
        }
    }
}

#[tool_handler]
impl ServerHandler for ManifestMcpService {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo::new(
            rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
        )
        .with_instructions(
            "Kubernetes CRD manifests: pick a data source, describe its schema, then resolve a configuration to YAML.",
        )
    }
}

/// Logs go to stderr; stdout carries the MCP transport.
fn init_logging(filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!(
        data_sources = catalog::catalog().len(),
        "starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    let service = ManifestMcpService::new();
    let transport = stdio();
    let server = service.serve(transport).await?;
    server.waiting().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        None | Some(Commands::Serve) => serve().await,
        Some(command) => {
            let out = cli::run_offline(&command)?;
            println!("{}", out.trim_end());
            Ok(())
        }
    }
}
