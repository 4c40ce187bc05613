//! Action resolution errors.
//!
//! Pre-validation failures read as player-facing text because the engine
//! returns them as the reason an action was refused.

use crate::env::OracleError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, InitializationError, PlacementError, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("actor {0} is dead")]
    ActorDead(EntityId),

    #[error("That way is blocked.")]
    OutOfBounds { destination: Position },

    #[error("That way is blocked.")]
    Blocked { destination: Position },

    #[error("That way is blocked.")]
    Occupied {
        destination: Position,
        occupant: EntityId,
    },

    #[error("{target} is out of reach of {attacker}.")]
    NotAdjacent { attacker: EntityId, target: EntityId },

    #[error("Nothing to attack.")]
    FriendlyTarget { attacker: EntityId, target: EntityId },

    #[error("There is nothing here to pick up.")]
    NothingToPickUp { position: Position },

    #[error("actor {0} carries no inventory")]
    NoInventory(EntityId),

    #[error("You don't have any health potions!")]
    EmptyInventory,

    #[error("There are no stairs here.")]
    NotOnStairs { position: Position },

    #[error("only the player can take the stairs (got {0})")]
    NotPlayer(EntityId),

    #[error("That action is not available right now.")]
    Unavailable,

    #[error("death of {0} was not resolved")]
    DeathNotResolved(EntityId),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    LevelLoad(#[from] InitializationError),

    #[error(transparent)]
    Placement(#[from] PlacementError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            OutOfBounds { .. }
            | Blocked { .. }
            | Occupied { .. }
            | NotAdjacent { .. }
            | FriendlyTarget { .. }
            | NothingToPickUp { .. }
            | EmptyInventory
            | NotOnStairs { .. }
            | Unavailable => ErrorSeverity::Recoverable,
            ActorNotFound(_) | ActorDead(_) | NoInventory(_) | NotPlayer(_) => {
                ErrorSeverity::Validation
            }
            DeathNotResolved(_) | Placement(_) => ErrorSeverity::Internal,
            Oracle(_) | LevelLoad(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            ActorNotFound(_) => "ACTION_ACTOR_NOT_FOUND",
            ActorDead(_) => "ACTION_ACTOR_DEAD",
            OutOfBounds { .. } => "ACTION_OUT_OF_BOUNDS",
            Blocked { .. } => "ACTION_BLOCKED",
            Occupied { .. } => "ACTION_OCCUPIED",
            NotAdjacent { .. } => "ACTION_NOT_ADJACENT",
            FriendlyTarget { .. } => "ACTION_FRIENDLY_TARGET",
            NothingToPickUp { .. } => "ACTION_NOTHING_TO_PICK_UP",
            NoInventory(_) => "ACTION_NO_INVENTORY",
            EmptyInventory => "ACTION_EMPTY_INVENTORY",
            NotOnStairs { .. } => "ACTION_NOT_ON_STAIRS",
            NotPlayer(_) => "ACTION_NOT_PLAYER",
            Unavailable => "ACTION_UNAVAILABLE",
            DeathNotResolved(_) => "ACTION_DEATH_NOT_RESOLVED",
            Oracle(error) => error.error_code(),
            LevelLoad(error) => error.error_code(),
            Placement(error) => error.error_code(),
        }
    }
}
