//! Action domain.
//!
//! Each action is a small struct implementing [`ActionTransition`]: a
//! read-only `pre_validate` that decides legality, an `apply` that mutates the
//! state and appends messages, and a `post_validate` that checks the registry
//! is still consistent. [`CharacterAction`] is the closed set the engine
//! dispatches over.
//!
//! # Module Structure
//!
//! - `movement`: move and bump (move-or-attack)
//! - `combat`: melee attack and the damage formula
//! - `inventory`: pickup and potion use
//! - `stairs`: level transition or victory
//! - `token`: external action vocabulary
//! - `available`: legal-action computation

pub mod available;
mod combat;
mod error;
mod inventory;
mod movement;
mod stairs;
mod token;
mod wait;

pub use available::legal_actions;
pub use combat::{AttackAction, AttackOutcome, PLAYER_DEATH_MESSAGE, compute_damage};
pub use error::ActionError;
pub use inventory::{PickupAction, UseItemAction};
pub use movement::{BumpAction, BumpOutcome, CardinalDirection, MoveAction};
pub use stairs::{DESCEND_MESSAGE, StairsOutcome, TakeStairsAction, VICTORY_MESSAGE};
pub use token::{ActionToken, UnknownToken};
pub use wait::WaitAction;

use crate::env::{GameEnv, ItemKind};
use crate::state::{ActorState, EntityId, GameState, Position};

/// Defines how a concrete action variant mutates game state.
///
/// Implementors can override the validation hooks to surface pre- and
/// post-conditions that must hold around the state mutation. All hooks
/// receive read-only access to deterministic environment facts via
/// [`GameEnv`] and must stay side-effect free.
pub trait ActionTransition {
    type Error;
    type Result;

    /// Returns the entity performing this action.
    fn actor(&self) -> EntityId;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly.
    fn apply(&self, state: &mut GameState, env: &GameEnv<'_>) -> Result<Self::Result, Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Actions an actor can take during a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharacterAction {
    Move(MoveAction),
    Bump(BumpAction),
    Attack(AttackAction),
    Wait(WaitAction),
    Pickup(PickupAction),
    UseItem(UseItemAction),
    TakeStairs(TakeStairsAction),
}

impl CharacterAction {
    /// Maps an external token to the action it requests. Navigation tokens
    /// do not map to an in-game action.
    pub fn from_token(actor: EntityId, token: ActionToken) -> Option<Self> {
        let action = match token {
            ActionToken::North | ActionToken::South | ActionToken::East | ActionToken::West => {
                let direction = token.direction()?;
                CharacterAction::Bump(BumpAction::new(actor, direction))
            }
            ActionToken::Wait => CharacterAction::Wait(WaitAction::new(actor)),
            ActionToken::Pickup => CharacterAction::Pickup(PickupAction::new(actor)),
            ActionToken::UseInventory => CharacterAction::UseItem(UseItemAction::new(actor)),
            ActionToken::TakeStairs => CharacterAction::TakeStairs(TakeStairsAction::new(actor)),
            ActionToken::Escape | ActionToken::Quit => return None,
        };
        Some(action)
    }

    pub fn actor(&self) -> EntityId {
        match self {
            CharacterAction::Move(action) => action.actor(),
            CharacterAction::Bump(action) => action.actor(),
            CharacterAction::Attack(action) => action.actor(),
            CharacterAction::Wait(action) => action.actor(),
            CharacterAction::Pickup(action) => action.actor(),
            CharacterAction::UseItem(action) => action.actor(),
            CharacterAction::TakeStairs(action) => action.actor(),
        }
    }

    /// Runs only the legality check of the wrapped action.
    pub fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), ActionError> {
        match self {
            CharacterAction::Move(action) => action.pre_validate(state, env),
            CharacterAction::Bump(action) => action.pre_validate(state, env),
            CharacterAction::Attack(action) => action.pre_validate(state, env),
            CharacterAction::Wait(action) => action.pre_validate(state, env),
            CharacterAction::Pickup(action) => action.pre_validate(state, env),
            CharacterAction::UseItem(action) => action.pre_validate(state, env),
            CharacterAction::TakeStairs(action) => action.pre_validate(state, env),
        }
    }
}

/// Action-specific execution result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionResult {
    Moved { to: Position },
    Attacked(AttackOutcome),
    Waited,
    PickedUp(ItemKind),
    Healed { restored: u32 },
    Descended { dungeon_level: u32, max_hp_gain: u32 },
    Escaped,
}

impl ActionResult {
    /// True when the action ended the level (descent or exit).
    pub fn ends_level(&self) -> bool {
        matches!(self, ActionResult::Descended { .. } | ActionResult::Escaped)
    }
}

/// Looks up an actor that exists and is alive.
pub(crate) fn live_actor(state: &GameState, id: EntityId) -> Result<&ActorState, ActionError> {
    let actor = state
        .entities
        .actor(id)
        .ok_or(ActionError::ActorNotFound(id))?;
    if !actor.alive {
        return Err(ActionError::ActorDead(id));
    }
    Ok(actor)
}
