//! MCP host: exposes the tool registry to an agent over stdio
//!
//! Newline-delimited JSON-RPC 2.0 on stdin/stdout.

pub mod codec;
pub mod messages;
pub mod server;

pub use codec::NdJsonCodec;
pub use messages::{CallParams, ErrorCode, Method, Request, Response, ResponseError};
pub use server::McpServer;
