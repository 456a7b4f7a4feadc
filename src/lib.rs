//! revit-mcp - MCP tools for driving Autodesk Revit
//!
//! An agent calls named tools over MCP; each tool validates its arguments
//! against a declarative schema, normalizes them into a command payload,
//! sends that payload to the Revit add-in over one scoped connection and
//! renders the reply as text segments.

pub mod config;
pub mod error;
pub mod mcp;
pub mod revit;
pub mod schema;
pub mod tools;

pub use error::{Result, RevitMcpError};
