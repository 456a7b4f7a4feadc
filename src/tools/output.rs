//! Output segments and the per-invocation outcome

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::revit::{CommandReply, TransportError};

/// One block of output returned to the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Result of a tool invocation, in MCP `tools/call` shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<Content>,
    #[serde(rename = "isError", default)]
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: Vec<Content>) -> Self {
        Self {
            content,
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::text(text)],
            is_error: true,
        }
    }

    /// Text of the first segment, or "" when there is none
    pub fn first_text(&self) -> &str {
        self.content.first().map(Content::as_text).unwrap_or("")
    }
}

/// How a dispatched command ended
#[derive(Debug)]
pub enum Outcome {
    /// Revit ran the command; carries `Response`
    Completed(Option<Value>),
    /// Revit was reached and replied `Success: false`; carries `Message`
    Rejected(Option<String>),
    /// The command never completed a round trip
    Unreachable(TransportError),
}

impl From<Result<CommandReply, TransportError>> for Outcome {
    fn from(result: Result<CommandReply, TransportError>) -> Self {
        match result {
            Ok(reply) if reply.success => Self::Completed(reply.response),
            Ok(reply) => Self::Rejected(reply.message),
            Err(e) => Self::Unreachable(e),
        }
    }
}
