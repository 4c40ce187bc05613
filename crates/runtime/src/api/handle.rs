//! Cloneable façade for driving the session.
//!
//! [`SessionHandle`] hides channel plumbing and offers async helpers for
//! starting games, submitting tokens and reading snapshots. Handles can be
//! cloned freely; every submission is serialized through the session worker.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use game_core::{ActionToken, Snapshot};

use super::errors::{Result, RuntimeError};
use super::request::StartRequest;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// A submitted action, either already parsed or as the raw string a client typed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenInput {
    Raw(String),
    Token(ActionToken),
}

impl TokenInput {
    fn resolve(self) -> Result<ActionToken> {
        match self {
            TokenInput::Raw(raw) => Ok(raw.parse::<ActionToken>()?),
            TokenInput::Token(token) => Ok(token),
        }
    }
}

impl From<ActionToken> for TokenInput {
    fn from(token: ActionToken) -> Self {
        TokenInput::Token(token)
    }
}

impl From<&str> for TokenInput {
    fn from(raw: &str) -> Self {
        TokenInput::Raw(raw.to_owned())
    }
}

impl From<String> for TokenInput {
    fn from(raw: String) -> Self {
        TokenInput::Raw(raw)
    }
}

/// Client-facing handle to the live session.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    snapshot_rx: watch::Receiver<Option<Arc<Snapshot>>>,
    turn_timeout: Duration,
}

impl SessionHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        snapshot_rx: watch::Receiver<Option<Arc<Snapshot>>>,
        turn_timeout: Duration,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            snapshot_rx,
            turn_timeout,
        }
    }

    /// Starts a new session, replacing the current one on success.
    ///
    /// A refused request leaves the running session untouched.
    pub async fn start(&self, request: StartRequest) -> Result<Arc<Snapshot>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::Start {
                request,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Submits one action token and returns the snapshot after the turn.
    ///
    /// Queueing the command is not bounded; only the wait for the reply is.
    /// If the worker does not answer within the turn timeout, the most recent
    /// published snapshot is returned instead. The queued submission still
    /// runs to completion and its snapshot is published once it commits.
    pub async fn submit_action(&self, input: impl Into<TokenInput>) -> Result<Arc<Snapshot>> {
        let token = input.into().resolve()?;

        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Submit {
                token,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        match tokio::time::timeout(self.turn_timeout, reply_rx).await {
            Ok(reply) => reply.map_err(RuntimeError::ReplyChannelClosed)?,
            Err(_) => {
                tracing::warn!(
                    target: "runtime::handle",
                    token = %token,
                    timeout_ms = self.turn_timeout.as_millis() as u64,
                    "turn did not finish in time; returning last snapshot"
                );
                self.snapshot()
                    .ok_or(RuntimeError::NoActiveSession { phase: None })
            }
        }
    }

    /// Tokens the current session accepts. Empty when no session is active.
    pub async fn legal_actions(&self) -> Result<Vec<ActionToken>> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(Command::LegalActions { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Most recently published snapshot, if a session was ever started.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.snapshot_rx.borrow().clone()
    }

    /// Receiver that is notified on every committed snapshot.
    pub fn subscribe_snapshots(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.snapshot_rx.clone()
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - session starts and phase changes
    /// - `Topic::Turn` - committed, rejected and aborted submissions
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
