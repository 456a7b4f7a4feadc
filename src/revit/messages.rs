//! Wire types exchanged with the Revit add-in.
//!
//! Commands travel as JSON-RPC 2.0 requests; the add-in answers with a
//! JSON-RPC response whose `result` is a [`CommandReply`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TransportError;

/// Structured reply produced by a Revit command handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandReply {
    /// Whether the command succeeded inside Revit
    #[serde(rename = "Success")]
    pub success: bool,
    /// Command-specific payload; only meaningful when `success` is true
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    /// Failure description, or a diagnostic on success
    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CommandReply {
    /// Create a successful reply
    pub fn success(response: Value) -> Self {
        Self {
            success: true,
            response: Some(response),
            message: None,
        }
    }

    /// Create a failed reply
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response: None,
            message: Some(message.into()),
        }
    }
}

/// JSON-RPC request carrying one command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    pub id: u64,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC response from the add-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    /// Echoed request id; the add-in may send it as a string
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// Extract the command reply, mapping RPC-level errors to transport errors
    pub fn into_reply(self) -> Result<CommandReply, TransportError> {
        if let Some(error) = self.error {
            return Err(TransportError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = self
            .result
            .ok_or_else(|| TransportError::Protocol("reply carried neither result nor error".into()))?;

        serde_json::from_value(result).map_err(|e| TransportError::Protocol(format!("unexpected reply shape: {}", e)))
    }
}

/// JSON-RPC error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_reply_parsing() {
        let reply: CommandReply =
            serde_json::from_value(json!({"Success": true, "Response": [1, 2], "Message": null})).unwrap();
        assert!(reply.success);
        assert_eq!(reply.response, Some(json!([1, 2])));
        assert!(reply.message.is_none());
    }

    #[test]
    fn test_command_reply_failure_serialization() {
        let json = serde_json::to_value(CommandReply::failure("no elements matched")).unwrap();
        assert_eq!(json, json!({"Success": false, "Message": "no elements matched"}));
    }

    #[test]
    fn test_rpc_request_shape() {
        let request = RpcRequest::new(7, "create_grid", json!({"xCount": 2}));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["method"], "create_grid");
        assert_eq!(json["params"]["xCount"], 2);
        assert_eq!(json["id"], 7);
    }

    #[test]
    fn test_into_reply_result() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": "7",
            "result": {"Success": true, "Response": {"total": 3}}
        }))
        .unwrap();
        let reply = response.into_reply().unwrap();
        assert!(reply.success);
        assert_eq!(reply.response.unwrap()["total"], 3);
    }

    #[test]
    fn test_into_reply_rpc_error() {
        let response: RpcResponse = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "Method not found"}
        }))
        .unwrap();
        let err = response.into_reply().unwrap_err();
        assert!(matches!(err, TransportError::Rpc { code: -32601, .. }));
    }

    #[test]
    fn test_into_reply_empty() {
        let response: RpcResponse = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(matches!(response.into_reply(), Err(TransportError::Protocol(_))));
    }

    #[test]
    fn test_into_reply_wrong_shape() {
        let response: RpcResponse = serde_json::from_value(json!({"id": 1, "result": "ok"})).unwrap();
        assert!(matches!(response.into_reply(), Err(TransportError::Protocol(_))));
    }
}
