//! CLI module for revit-mcp - command-line interface and subcommands.
//!
//! Serves MCP over stdio by default; `tools` and `call` inspect and exercise
//! the tool set without an agent.

pub mod commands;

pub use commands::Cli;
