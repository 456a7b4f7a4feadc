//! Scripted connector for tests and offline runs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use super::{CommandReply, Connection, Connector, TransportError};

/// A command observed by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct SentCommand {
    pub command: String,
    pub payload: Value,
}

#[derive(Debug, Clone)]
enum Behavior {
    Reply(CommandReply),
    /// Connection opens but the send fails
    Fail(String),
    /// Connection cannot be opened
    Refuse(String),
}

#[derive(Debug, Default)]
struct Journal {
    sent: Mutex<Vec<SentCommand>>,
    opened: AtomicUsize,
    closed: AtomicUsize,
}

/// Connector that answers every command with the same scripted outcome
#[derive(Debug, Clone)]
pub struct MockConnector {
    behavior: Behavior,
    journal: Arc<Journal>,
}

impl MockConnector {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            journal: Arc::new(Journal::default()),
        }
    }

    /// Every command receives `reply`
    pub fn replying(reply: CommandReply) -> Self {
        Self::with_behavior(Behavior::Reply(reply))
    }

    /// Connections open, but every send fails with `reason`
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Fail(reason.into()))
    }

    /// Every connection attempt fails with `reason`
    pub fn refusing(reason: impl Into<String>) -> Self {
        Self::with_behavior(Behavior::Refuse(reason.into()))
    }

    /// Commands sent so far, in order
    pub fn sent(&self) -> Vec<SentCommand> {
        self.journal.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of connections opened
    pub fn opened(&self) -> usize {
        self.journal.opened.load(Ordering::SeqCst)
    }

    /// Number of connections closed
    pub fn closed(&self) -> usize {
        self.journal.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self) -> Result<Box<dyn Connection>, TransportError> {
        if let Behavior::Refuse(reason) = &self.behavior {
            return Err(TransportError::Unavailable(reason.clone()));
        }
        self.journal.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockConnection {
            behavior: self.behavior.clone(),
            journal: Arc::clone(&self.journal),
            open: true,
        }))
    }
}

struct MockConnection {
    behavior: Behavior,
    journal: Arc<Journal>,
    open: bool,
}

#[async_trait]
impl Connection for MockConnection {
    async fn send_command(&mut self, command: &str, payload: &Value) -> Result<CommandReply, TransportError> {
        if !self.open {
            return Err(TransportError::Closed);
        }
        self.journal
            .sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SentCommand {
                command: command.to_string(),
                payload: payload.clone(),
            });

        match &self.behavior {
            Behavior::Reply(reply) => Ok(reply.clone()),
            Behavior::Fail(reason) | Behavior::Refuse(reason) => Err(TransportError::Unavailable(reason.clone())),
        }
    }

    async fn close(&mut self) {
        if self.open {
            self.open = false;
            self.journal.closed.fetch_add(1, Ordering::SeqCst);
        }
    }
}
