//! Revit transport layer
//!
//! This module provides:
//! - Wire types for commands and replies
//! - `Connector`/`Connection` seams with scoped acquisition via `dispatch`
//! - `TcpConnector` for the real add-in
//! - `MockConnector` for tests

pub mod client;
pub mod connection;
pub mod messages;
pub mod mock;

pub use client::{RevitConnection, TcpConnector};
pub use connection::{Connection, Connector, TransportError, dispatch};
pub use messages::{CommandReply, RpcError, RpcRequest, RpcResponse};
pub use mock::{MockConnector, SentCommand};
