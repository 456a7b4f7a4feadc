use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use log::info;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use revit_mcp::config::Config;
use revit_mcp::mcp::McpServer;
use revit_mcp::revit::TcpConnector;
use revit_mcp::tools::ToolRegistry;

/// Log to a file; stdout carries the MCP protocol
fn setup_logging(default_level: &str) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("revit-mcp")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("revit-mcp.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli, config: Config) -> Result<()> {
    match &cli.command {
        None | Some(Commands::Serve) => serve(config).await,
        Some(Commands::Tools { json }) => list_tools(*json),
        Some(Commands::Call { tool, args }) => call_tool(tool, args, &config, cli.is_verbose()).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let connector = TcpConnector::new(config.revit.clone());
    info!("Serving MCP on stdio, Revit add-in at {}", connector.address());

    let server = McpServer::new(Arc::new(ToolRegistry::standard()), Arc::new(connector), config.server);
    server.run_stdio().await.context("MCP server failed")?;

    info!("MCP server stopped");
    Ok(())
}

fn list_tools(json: bool) -> Result<()> {
    let registry = ToolRegistry::standard();
    if json {
        let defs = serde_json::to_string_pretty(&registry.definitions()).context("Failed to serialize tools")?;
        println!("{}", defs);
        return Ok(());
    }

    for def in registry.definitions() {
        println!("{}", def.name.green());
        println!("    {}", def.description);
    }
    Ok(())
}

async fn call_tool(tool: &str, args: &str, config: &Config, verbose: bool) -> Result<()> {
    let args: Value = serde_json::from_str(args).context("Tool arguments must be valid JSON")?;
    let registry = ToolRegistry::standard();
    let connector = TcpConnector::new(config.revit.clone());

    if verbose {
        println!("{} {} at {}", "Calling".cyan(), tool, connector.address());
    }

    let output = registry.call(tool, &args, &connector).await;
    for segment in &output.content {
        if output.is_error {
            println!("{}", segment.as_text().red());
        } else {
            println!("{}", segment.as_text());
        }
    }

    if output.is_error {
        return Err(eyre!("{} failed", tool));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging before config so load diagnostics are kept
    let explicit_level = cli.is_verbose() || std::env::var_os("RUST_LOG").is_some();
    setup_logging(if cli.is_verbose() { "debug" } else { "revit_mcp=trace,info" }).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref())
        .context("Failed to load configuration")?
        .with_overrides(cli.host.as_deref(), cli.port);

    // RUST_LOG and --verbose win over the configured level
    if !explicit_level {
        log::set_max_level(config.level_filter());
    }

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, config).await.context("Application failed")?;

    Ok(())
}
