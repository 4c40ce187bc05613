//! Error types for the action pipeline and the turn scheduler.

use crate::action::{
    ActionError, ActionToken, ActionTransition, AttackAction, BumpAction, MoveAction,
    PickupAction, TakeStairsAction, UseItemAction, WaitAction,
};
use crate::engine::GamePhase;
use crate::error::{ErrorSeverity, GameError};
use crate::state::PlacementError;

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
            TransitionPhase::PostValidate => "post_validate",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Errors surfaced while executing a single action through the engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("move action failed: {0}")]
    Move(TransitionPhaseError<<MoveAction as ActionTransition>::Error>),

    #[error("bump action failed: {0}")]
    Bump(TransitionPhaseError<<BumpAction as ActionTransition>::Error>),

    #[error("attack action failed: {0}")]
    Attack(TransitionPhaseError<<AttackAction as ActionTransition>::Error>),

    #[error("wait action failed: {0}")]
    Wait(TransitionPhaseError<<WaitAction as ActionTransition>::Error>),

    #[error("pickup action failed: {0}")]
    Pickup(TransitionPhaseError<<PickupAction as ActionTransition>::Error>),

    #[error("use item action failed: {0}")]
    UseItem(TransitionPhaseError<<UseItemAction as ActionTransition>::Error>),

    #[error("take stairs action failed: {0}")]
    TakeStairs(TransitionPhaseError<<TakeStairsAction as ActionTransition>::Error>),

    /// Registry check after the whole turn failed.
    #[error("entity registry corrupted: {0}")]
    Registry(PlacementError),
}

impl ExecuteError {
    fn parts(&self) -> Option<&TransitionPhaseError<ActionError>> {
        match self {
            ExecuteError::Move(inner)
            | ExecuteError::Bump(inner)
            | ExecuteError::Attack(inner)
            | ExecuteError::Wait(inner)
            | ExecuteError::Pickup(inner)
            | ExecuteError::UseItem(inner)
            | ExecuteError::TakeStairs(inner) => Some(inner),
            ExecuteError::Registry(_) => None,
        }
    }

    /// Pipeline stage that failed, if the error came from an action.
    pub fn phase(&self) -> Option<TransitionPhase> {
        self.parts().map(|inner| inner.phase)
    }

    /// Underlying action error, if any.
    pub fn action_error(&self) -> Option<&ActionError> {
        self.parts().map(|inner| &inner.error)
    }

    /// A pre-validate failure leaves the state untouched; everything else
    /// may have left it half-applied.
    pub fn is_rejection(&self) -> bool {
        self.phase() == Some(TransitionPhase::PreValidate)
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match (self.phase(), self.action_error()) {
            (Some(TransitionPhase::PreValidate), Some(error)) => error.severity(),
            (_, Some(error)) if error.severity() == ErrorSeverity::Fatal => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::Registry(error) => error.error_code(),
            other => other
                .action_error()
                .map(GameError::error_code)
                .unwrap_or("EXECUTE_UNKNOWN"),
        }
    }
}

/// Why a submitted token did not produce a turn.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// The session is not playing and the token is not a navigation token.
    #[error("no active session (phase: {phase})")]
    NoActiveSession { phase: GamePhase },

    /// The token is not in the current legal set.
    #[error("illegal action '{token}': {reason}")]
    Illegal {
        token: ActionToken,
        reason: ActionError,
    },

    /// An internal invariant broke mid-turn. The state the engine ran on must
    /// be discarded.
    #[error("turn aborted: {0}")]
    Invariant(#[from] ExecuteError),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::NoActiveSession { .. } => ErrorSeverity::Validation,
            TurnError::Illegal { reason, .. } => reason.severity(),
            TurnError::Invariant(error) => error.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::NoActiveSession { .. } => "TURN_NO_ACTIVE_SESSION",
            TurnError::Illegal { .. } => "TURN_ILLEGAL_ACTION",
            TurnError::Invariant(error) => error.error_code(),
        }
    }
}
