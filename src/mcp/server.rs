//! MCP server - JSON-RPC over a line-delimited byte stream
//!
//! Provides:
//! - Request routing for initialize, ping, tools/list and tools/call
//! - One spawned task per tools/call, so slow Revit commands do not block the reader
//! - A single writer task that serializes every response onto the output

use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, FramedWrite};

use super::codec::NdJsonCodec;
use super::messages::{CallParams, Method, Request, Response, ResponseError, initialize_result};
use crate::config::ServerConfig;
use crate::error::{Result, RevitMcpError};
use crate::revit::Connector;
use crate::tools::ToolRegistry;

/// Responses queued for the writer before backpressure applies
const RESPONSE_CHANNEL_CAPACITY: usize = 64;

/// MCP server bound to a tool registry and a Revit connector
#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    connector: Arc<dyn Connector>,
    info: ServerConfig,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>, connector: Arc<dyn Connector>, info: ServerConfig) -> Self {
        Self {
            registry,
            connector,
            info,
        }
    }

    /// Serve on the process's stdin/stdout until stdin closes
    pub async fn run_stdio(self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests read from `reader`, writing responses to `writer`.
    ///
    /// Returns once the input ends and every in-flight call has answered.
    pub async fn serve<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let mut frames = FramedRead::new(reader, NdJsonCodec::<Value>::new());
        let (tx, rx) = mpsc::channel::<Response>(RESPONSE_CHANNEL_CAPACITY);
        let writer_task = tokio::spawn(write_responses(writer, rx));

        log::info!("MCP server {} {} ready", self.info.name, self.info.version);

        let mut read_result = Ok(());
        while let Some(frame) = frames.next().await {
            match frame {
                Ok(Ok(message)) => self.handle_message(message, &tx).await,
                Ok(Err(e)) => {
                    log::warn!("Unparseable message: {}", e);
                    let response = Response::error(Value::Null, ResponseError::parse_error(format!("Parse error: {}", e)));
                    if tx.send(response).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Input stream failed: {}", e);
                    read_result = Err(RevitMcpError::Io(e));
                    break;
                }
            }
        }

        log::info!("Input closed, draining in-flight calls");
        drop(tx);
        match writer_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::error!("Output stream failed: {}", e),
            Err(e) => log::error!("Writer task panicked: {}", e),
        }
        read_result
    }

    async fn handle_message(&self, message: Value, tx: &mpsc::Sender<Response>) {
        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: Request = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                let response = Response::error(id, ResponseError::invalid_request(e.to_string()));
                let _ = tx.send(response).await;
                return;
            }
        };

        if request.is_notification() {
            match request.method.as_str() {
                Method::INITIALIZED => log::info!("Client initialized"),
                other => log::debug!("Ignoring notification {}", other),
            }
            return;
        }

        if request.method == Method::TOOLS_CALL {
            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let response = server.call_tool(id, request.params).await;
                let _ = tx.send(response).await;
            });
            return;
        }

        let response = self.handle_request(id, &request);
        let _ = tx.send(response).await;
    }

    /// Answer every method except tools/call
    fn handle_request(&self, id: Value, request: &Request) -> Response {
        log::debug!("Request {} ({})", request.method, id);
        match request.method.as_str() {
            Method::INITIALIZE => Response::success(id, initialize_result(&request.params, &self.info)),
            Method::PING => Response::success(id, json!({})),
            Method::TOOLS_LIST => match serde_json::to_value(self.registry.definitions()) {
                Ok(tools) => Response::success(id, json!({ "tools": tools })),
                Err(e) => Response::error(id, ResponseError::internal_error(e.to_string())),
            },
            other => Response::error(id, ResponseError::method_not_found(other)),
        }
    }

    async fn call_tool(&self, id: Value, params: Value) -> Response {
        let params: CallParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => return Response::error(id, ResponseError::invalid_params(format!("Invalid tools/call params: {}", e))),
        };

        log::info!("Calling tool {}", params.name);
        let output = self
            .registry
            .call(&params.name, &params.arguments, self.connector.as_ref())
            .await;
        if output.is_error {
            log::warn!("Tool {} failed: {}", params.name, output.first_text());
        }

        match serde_json::to_value(&output) {
            Ok(result) => Response::success(id, result),
            Err(e) => Response::error(id, ResponseError::internal_error(e.to_string())),
        }
    }
}

async fn write_responses<W>(writer: W, mut rx: mpsc::Receiver<Response>) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut sink = FramedWrite::new(writer, NdJsonCodec::<Response>::new());
    while let Some(response) = rx.recv().await {
        sink.send(response).await?;
    }
    sink.close().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revit::{CommandReply, MockConnector};
    use tokio::io::AsyncReadExt;

    async fn run(input: &str, connector: MockConnector) -> Vec<Value> {
        let server = McpServer::new(
            Arc::new(ToolRegistry::standard()),
            Arc::new(connector),
            ServerConfig::default(),
        );
        let (out_tx, mut out_rx) = tokio::io::duplex(1 << 20);
        server.serve(input.as_bytes(), out_tx).await.unwrap();

        let mut output = String::new();
        out_rx.read_to_string(&mut output).await.unwrap();
        output.lines().map(|line| serde_json::from_str(line).unwrap()).collect()
    }

    fn by_id(responses: &[Value], id: i64) -> &Value {
        responses.iter().find(|r| r["id"] == id).unwrap()
    }

    fn idle() -> MockConnector {
        MockConnector::replying(CommandReply::success(json!(null)))
    }

    #[tokio::test]
    async fn test_initialize_and_ping() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
            "\n",
        );
        let responses = run(input, idle()).await;
        assert_eq!(responses.len(), 2);
        assert_eq!(by_id(&responses, 1)["result"]["serverInfo"]["name"], "revit-mcp");
        assert_eq!(by_id(&responses, 2)["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let responses = run("{\"jsonrpc\":\"2.0\",\"id\":3,\"method\":\"tools/list\"}\n", idle()).await;
        let tools = responses[0]["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 8);
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let connector = MockConnector::replying(CommandReply::success(json!([{"id": 1, "category": "Walls"}])));
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"ai_element_filter","arguments":{"data":{"filterCategory":"OST_Walls"}}}}"#,
            "\n"
        );
        let responses = run(input, connector.clone()).await;
        let result = &by_id(&responses, 4)["result"];
        assert_eq!(result["isError"], false);
        assert!(result["content"][0]["text"].as_str().unwrap().starts_with("Found 1 element(s)"));
        assert_eq!(connector.sent()[0].payload["data"]["filterCategory"], "OST_Walls");
    }

    #[tokio::test]
    async fn test_tools_call_missing_name() {
        let input = "{\"jsonrpc\":\"2.0\",\"id\":5,\"method\":\"tools/call\",\"params\":{}}\n";
        let responses = run(input, idle()).await;
        assert_eq!(responses[0]["error"]["code"], -32602);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let responses = run("{\"jsonrpc\":\"2.0\",\"id\":6,\"method\":\"resources/list\"}\n", idle()).await;
        assert_eq!(responses[0]["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn test_invalid_request_echoes_id() {
        let input = "{\"jsonrpc\":\"2.0\",\"id\":5}\n[1,2]\n";
        let responses = run(input, idle()).await;
        assert_eq!(responses.len(), 2);
        assert_eq!(by_id(&responses, 5)["error"]["code"], -32600);
        let anonymous = responses.iter().find(|r| r["id"].is_null()).unwrap();
        assert_eq!(anonymous["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_parse_error_keeps_serving() {
        let input = "{oops\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n";
        let responses = run(input, idle()).await;
        assert_eq!(responses.len(), 2);
        let parse = responses.iter().find(|r| r["id"].is_null()).unwrap();
        assert_eq!(parse["error"]["code"], -32700);
        assert_eq!(by_id(&responses, 7)["result"], json!({}));
    }

    #[tokio::test]
    async fn test_unknown_method_notification_is_silent() {
        let responses = run("{\"jsonrpc\":\"2.0\",\"method\":\"notifications/cancelled\"}\n", idle()).await;
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_tool_error_not_rpc_error() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"export_room_data"}}"#,
            "\n"
        );
        let responses = run(input, MockConnector::refusing("Revit is not running")).await;
        let response = by_id(&responses, 8);
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], true);
        assert!(
            response["result"]["content"][0]["text"]
                .as_str()
                .unwrap()
                .contains("Revit is not running")
        );
    }
}
