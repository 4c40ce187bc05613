//! Unified error types surfaced by the runtime API.
//!
//! Mirrors the session's error taxonomy: validation errors for bad start
//! requests, illegal-action errors for refused tokens, and invariant
//! violations for aborted turns. Channel failures are reported separately.
//! Game errors are kept as typed sources so callers can read their
//! [`GameError`] codes.
use thiserror::Error;
use tokio::sync::oneshot;

use game_content::ValidationError;
use game_core::{
    ActionError, ActionToken, ErrorSeverity, ExecuteError, GameError, GamePhase,
    InitializationError, OracleError, UnknownToken,
};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The start request was refused; the previous session is untouched.
    #[error("invalid start request: {0}")]
    Validation(#[source] StartError),

    /// The token is not legal right now; no turn was consumed.
    #[error("illegal action '{token}': {reason}")]
    IllegalAction {
        token: ActionToken,
        #[source]
        reason: ActionError,
    },

    #[error(transparent)]
    UnknownToken(#[from] UnknownToken),

    /// No game is in progress (never started, or back at the menu).
    #[error("no active session")]
    NoActiveSession { phase: Option<GamePhase> },

    /// The turn was aborted and the session reverted to its pre-turn state.
    #[error("turn aborted by invariant violation: {0}")]
    InvariantViolation(#[source] ExecuteError),

    #[error("invalid runtime config: {0}")]
    Config(&'static str),

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl RuntimeError {
    /// Errors after which the session is exactly as it was before the call.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            RuntimeError::Validation(_)
                | RuntimeError::IllegalAction { .. }
                | RuntimeError::UnknownToken(_)
                | RuntimeError::NoActiveSession { .. }
        )
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Validation(error) => error.severity(),
            RuntimeError::IllegalAction { reason, .. } => reason.severity(),
            RuntimeError::UnknownToken(_)
            | RuntimeError::NoActiveSession { .. }
            | RuntimeError::Config(_) => ErrorSeverity::Validation,
            RuntimeError::InvariantViolation(error) => error.severity(),
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::Validation(error) => error.error_code(),
            RuntimeError::IllegalAction { reason, .. } => reason.error_code(),
            RuntimeError::UnknownToken(_) => "TOKEN_UNKNOWN",
            RuntimeError::NoActiveSession { .. } => "TURN_NO_ACTIVE_SESSION",
            RuntimeError::InvariantViolation(error) => error.error_code(),
            RuntimeError::Config(_) => "RUNTIME_INVALID_CONFIG",
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
        }
    }
}

/// Why a start request was refused.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("procedural sessions do not take a map source")]
    UnexpectedMapSource,

    #[error("string sessions require inline map text")]
    MissingMapText,

    #[error(transparent)]
    InvalidMap(#[from] ValidationError),

    /// Reading or parsing a map file failed; the chain names the path.
    #[error("{0:#}")]
    MapFile(#[source] anyhow::Error),

    #[error(transparent)]
    Generation(#[from] OracleError),

    #[error(transparent)]
    InitialState(#[from] InitializationError),
}

impl GameError for StartError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            StartError::Generation(error) => error.severity(),
            StartError::InitialState(error) => error.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StartError::UnexpectedMapSource => "START_UNEXPECTED_MAP_SOURCE",
            StartError::MissingMapText => "START_MISSING_MAP_TEXT",
            StartError::InvalidMap(error) => error.error_code(),
            StartError::MapFile(error) => error
                .downcast_ref::<ValidationError>()
                .map_or("START_MAP_FILE", GameError::error_code),
            StartError::Generation(error) => error.error_code(),
            StartError::InitialState(error) => error.error_code(),
        }
    }
}

impl From<StartError> for RuntimeError {
    fn from(error: StartError) -> Self {
        RuntimeError::Validation(error)
    }
}
