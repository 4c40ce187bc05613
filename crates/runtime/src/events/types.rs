use serde::{Deserialize, Serialize};

use game_core::{ActionToken, GamePhase, Outcome, SessionMode};

/// Session lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A new session replaced whatever was running.
    SessionStarted {
        mode: SessionMode,
        seed: u64,
        dungeon_level: u32,
    },

    PhaseChanged {
        from: GamePhase,
        to: GamePhase,
        outcome: Outcome,
    },
}

/// Per-submission events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A turn (or a navigation step) was committed.
    TurnCompleted {
        token: ActionToken,
        nonce: u64,
        dungeon_level: u32,
        turn: u32,
        messages: Vec<String>,
        level_changed: bool,
    },

    /// The token was refused; nothing changed. `code` is the stable error code.
    ActionRejected {
        token: ActionToken,
        reason: String,
        code: String,
    },

    /// The turn broke an invariant and was rolled back.
    TurnAborted {
        token: ActionToken,
        error: String,
        code: String,
    },
}
