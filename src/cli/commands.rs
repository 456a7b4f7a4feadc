//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - serve: MCP server on stdin/stdout (the default)
//! - tools: list the registered tools
//! - call: run one tool against Revit and print its output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// revit-mcp - MCP server exposing Revit modelling tools
#[derive(Parser, Debug)]
#[command(name = "revit-mcp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Revit add-in host (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Revit add-in port (overrides config)
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve MCP over stdin/stdout
    Serve,

    /// List the available tools
    Tools {
        /// Print full definitions, including input schemas, as JSON
        #[arg(long)]
        json: bool,
    },

    /// Call one tool and print its output
    Call {
        /// Tool name (e.g. create_grid)
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(default_value = "{}")]
        args: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No subcommand means serve
        let cli = Cli::try_parse_from(["revit-mcp"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["revit-mcp", "-v"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["revit-mcp", "-c", "/path/to/revit-mcp.yml"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/revit-mcp.yml")));
    }

    #[test]
    fn test_address_overrides() {
        let cli = Cli::try_parse_from(["revit-mcp", "serve", "--host", "10.0.0.5", "-p", "8181"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Serve)));
        assert_eq!(cli.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(cli.port, Some(8181));
    }

    #[test]
    fn test_tools_command() {
        let cli = Cli::try_parse_from(["revit-mcp", "tools", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Tools { json }) => assert!(json),
            _ => panic!("Expected tools command"),
        }
    }

    #[test]
    fn test_call_command_default_args() {
        let cli = Cli::try_parse_from(["revit-mcp", "call", "export_room_data"]).unwrap();
        match cli.command {
            Some(Commands::Call { tool, args }) => {
                assert_eq!(tool, "export_room_data");
                assert_eq!(args, "{}");
            }
            _ => panic!("Expected call command"),
        }
    }

    #[test]
    fn test_call_command_with_args() {
        let cli = Cli::try_parse_from(["revit-mcp", "call", "create_grid", r#"{"xCount":3}"#]).unwrap();
        match cli.command {
            Some(Commands::Call { args, .. }) => assert_eq!(args, r#"{"xCount":3}"#),
            _ => panic!("Expected call command"),
        }
    }

    #[test]
    fn test_bad_port_rejected() {
        assert!(Cli::try_parse_from(["revit-mcp", "--port", "99999"]).is_err());
    }

    #[test]
    fn test_help_works() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let result = Cli::try_parse_from(["revit-mcp", "--version"]);
        // Version flag causes early exit with error (expected)
        assert!(result.is_err());
    }
}
