//! Connection seams and the dispatch adapter

use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use super::CommandReply;

/// The round trip to Revit could not be completed.
///
/// Distinct from a `Success: false` reply: when this is returned the
/// command's effect inside Revit is unknown.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to connect to Revit at {addr}: {reason}")]
    Connect { addr: String, reason: String },

    #[error("Revit connection unavailable: {0}")]
    Unavailable(String),

    #[error("no reply from Revit within {0}ms")]
    Timeout(u64),

    #[error("connection closed before a complete reply was received")]
    Closed,

    #[error("failed to encode command: {0}")]
    Encode(String),

    #[error("invalid reply from Revit: {0}")]
    Protocol(String),

    #[error("Revit reported error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("I/O error talking to Revit: {0}")]
    Io(#[from] std::io::Error),
}

/// A live link to the Revit add-in, good for one or more commands
#[async_trait]
pub trait Connection: Send {
    /// Send one command and await its reply
    async fn send_command(&mut self, command: &str, payload: &Value) -> Result<CommandReply, TransportError>;

    /// Release the link. Must be safe to call more than once.
    async fn close(&mut self);
}

/// Source of connections. Must tolerate concurrent `connect` calls.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn Connection>, TransportError>;
}

/// Send exactly one command over a freshly acquired connection.
///
/// The connection is closed on every path: success, remote rejection and
/// transport failure. Nothing is retried.
pub async fn dispatch(connector: &dyn Connector, command: &str, payload: &Value) -> Result<CommandReply, TransportError> {
    debug!("Dispatching command {}", command);

    let mut connection = connector.connect().await.inspect_err(|e| {
        warn!("Could not connect for {}: {}", command, e);
    })?;

    let reply = connection.send_command(command, payload).await;
    connection.close().await;

    match &reply {
        Ok(r) => debug!("Command {} replied success={}", command, r.success),
        Err(e) => warn!("Command {} failed in transport: {}", command, e),
    }
    reply
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revit::MockConnector;
    use serde_json::json;

    #[tokio::test]
    async fn test_dispatch_closes_after_success() {
        let connector = MockConnector::replying(CommandReply::success(json!([])));
        let reply = dispatch(&connector, "ai_element_filter", &json!({})).await.unwrap();

        assert!(reply.success);
        assert_eq!(connector.opened(), 1);
        assert_eq!(connector.closed(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_closes_after_remote_failure() {
        let connector = MockConnector::replying(CommandReply::failure("invalid reference plane"));
        let reply = dispatch(&connector, "create_dimensions", &json!({})).await.unwrap();

        assert!(!reply.success);
        assert_eq!(connector.closed(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_closes_after_transport_failure() {
        let connector = MockConnector::failing("socket reset");
        let err = dispatch(&connector, "create_grid", &json!({})).await.unwrap_err();

        assert!(err.to_string().contains("socket reset"));
        assert_eq!(connector.opened(), 1);
        assert_eq!(connector.closed(), 1);
    }

    #[tokio::test]
    async fn test_dispatch_connect_failure() {
        let connector = MockConnector::refusing("Revit is not running");
        let err = dispatch(&connector, "create_grid", &json!({})).await.unwrap_err();

        assert!(matches!(err, TransportError::Unavailable(_)));
        assert_eq!(connector.opened(), 0);
        assert!(connector.sent().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_sends_exactly_one_command() {
        let connector = MockConnector::replying(CommandReply::success(json!({})));
        dispatch(&connector, "export_room_data", &json!({"includeUnplacedRooms": false}))
            .await
            .unwrap();

        let sent = connector.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].command, "export_room_data");
        assert_eq!(sent[0].payload["includeUnplacedRooms"], false);
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Connect {
            addr: "127.0.0.1:8080".to_string(),
            reason: "refused".to_string(),
        };
        assert_eq!(err.to_string(), "failed to connect to Revit at 127.0.0.1:8080: refused");
        assert_eq!(TransportError::Timeout(250).to_string(), "no reply from Revit within 250ms");
    }
}
