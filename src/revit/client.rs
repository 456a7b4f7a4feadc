//! TCP client for the Revit add-in.
//!
//! Provides:
//! - `TcpConnector`, one fresh socket per acquisition
//! - `RevitConnection`, JSON-RPC request/response over that socket
//!
//! The add-in does not delimit replies, so a reply is the first complete
//! JSON value read from the stream.

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use log::debug;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::RevitConfig;

use super::{CommandReply, Connection, Connector, RpcRequest, RpcResponse, TransportError};

/// Upper bound on a single reply (64 MB)
const MAX_REPLY_BYTES: usize = 64 * 1024 * 1024;

/// Opens a new TCP connection to the add-in for every acquisition
#[derive(Debug, Clone)]
pub struct TcpConnector {
    config: RevitConfig,
}

impl TcpConnector {
    pub fn new(config: RevitConfig) -> Self {
        Self { config }
    }

    /// `host:port` of the add-in
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }
}

#[async_trait]
impl Connector for TcpConnector {
    async fn connect(&self) -> Result<Box<dyn Connection>, TransportError> {
        let addr = self.address();
        let timeout = Duration::from_millis(self.config.timeout_ms);

        let stream = tokio::time::timeout(timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| TransportError::Timeout(self.config.timeout_ms))?
            .map_err(|e| TransportError::Connect {
                addr: addr.clone(),
                reason: e.to_string(),
            })?;

        debug!("Connected to Revit at {}", addr);
        Ok(Box::new(RevitConnection::new(stream, timeout)))
    }
}

/// One socket to the add-in
pub struct RevitConnection {
    stream: Option<TcpStream>,
    timeout: Duration,
    next_id: u64,
}

impl RevitConnection {
    pub fn new(stream: TcpStream, timeout: Duration) -> Self {
        Self {
            stream: Some(stream),
            timeout,
            next_id: 1,
        }
    }

    async fn round_trip(&mut self, request: &RpcRequest) -> Result<RpcResponse, TransportError> {
        let stream = self.stream.as_mut().ok_or(TransportError::Closed)?;

        let bytes = serde_json::to_vec(request).map_err(|e| TransportError::Encode(e.to_string()))?;
        stream.write_all(&bytes).await?;
        stream.flush().await?;

        read_reply(stream).await
    }
}

#[async_trait]
impl Connection for RevitConnection {
    async fn send_command(&mut self, command: &str, payload: &Value) -> Result<CommandReply, TransportError> {
        let id = self.next_id;
        self.next_id += 1;
        let request = RpcRequest::new(id, command, payload.clone());

        let timeout_ms = self.timeout.as_millis() as u64;
        let response = tokio::time::timeout(self.timeout, self.round_trip(&request))
            .await
            .map_err(|_| TransportError::Timeout(timeout_ms))??;

        response.into_reply()
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            // Peer may already be gone; nothing useful to do with the error
            let _ = stream.shutdown().await;
        }
    }
}

/// Incremental scan for the end of the first top-level JSON value.
///
/// Only tracks bracket depth and string state; the parser still has the
/// final word once a candidate end is seen.
#[derive(Debug, Default)]
struct ValueBoundary {
    scanned: usize,
    depth: usize,
    in_string: bool,
    escaped: bool,
}

impl ValueBoundary {
    /// Scan bytes added since the last call. True when the buffer may now
    /// hold a complete value (or starts with something that is not one).
    fn advance(&mut self, buffer: &[u8]) -> bool {
        let start = self.scanned;
        for (offset, &byte) in buffer.iter().enumerate().skip(start) {
            if self.in_string {
                match byte {
                    _ if self.escaped => self.escaped = false,
                    b'\\' => self.escaped = true,
                    b'"' => self.in_string = false,
                    _ => {}
                }
                continue;
            }
            match byte {
                b'"' => self.in_string = true,
                b'{' | b'[' => self.depth += 1,
                b'}' | b']' if self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        self.scanned = offset + 1;
                        return true;
                    }
                }
                b' ' | b'\t' | b'\r' | b'\n' => {}
                _ if self.depth == 0 => {
                    self.scanned = offset + 1;
                    return true;
                }
                _ => {}
            }
        }
        self.scanned = buffer.len();
        false
    }
}

/// Read until the buffer holds one complete JSON-RPC response
async fn read_reply<R: AsyncRead + Unpin>(reader: &mut R) -> Result<RpcResponse, TransportError> {
    let mut buffer = BytesMut::with_capacity(8 * 1024);
    let mut boundary = ValueBoundary::default();

    loop {
        if reader.read_buf(&mut buffer).await? == 0 {
            return Err(TransportError::Closed);
        }

        while boundary.advance(&buffer) {
            let mut values = serde_json::Deserializer::from_slice(&buffer).into_iter::<RpcResponse>();
            match values.next() {
                Some(Ok(response)) => return Ok(response),
                Some(Err(e)) if e.is_eof() => {}
                Some(Err(e)) => return Err(TransportError::Protocol(e.to_string())),
                None => {}
            }
        }

        if buffer.len() > MAX_REPLY_BYTES {
            return Err(TransportError::Protocol(format!(
                "reply exceeds {} bytes",
                MAX_REPLY_BYTES
            )));
        }
    }
}
