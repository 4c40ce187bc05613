//! Deterministic turn engine for the dungeon crawler.
//!
//! `game-core` defines the canonical rules (map and visibility, entity
//! registry, actions, enemy AI, phase machine) and exposes pure APIs that are
//! driven by the runtime's session worker. All state mutation flows through
//! [`engine::GameEngine`], and supporting crates depend on the types
//! re-exported here.
pub mod action;
pub mod ai;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod fov;
pub mod snapshot;
pub mod state;

#[cfg(test)]
mod test_support;

pub use action::{
    ActionError, ActionResult, ActionToken, ActionTransition, AttackAction, AttackOutcome,
    BumpAction, CardinalDirection, CharacterAction, MoveAction, PickupAction, TakeStairsAction,
    UnknownToken, UseItemAction, WaitAction, legal_actions,
};
pub use config::{FovMode, GameConfig};
pub use engine::{
    ExecuteError, GameEngine, GamePhase, Outcome, PhaseEvent, TransitionPhase,
    TransitionPhaseError, TurnError, TurnOutcome,
};
pub use env::{
    ActorTemplate, EnemyKind, GameEnv, InitialEntityKind, InitialEntitySpec, ItemKind,
    LEVEL_SEED_CONTEXT, LevelBlueprint, LevelOracle, MapDimensions, OracleError, TerrainKind,
    compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use fov::{VisibleSet, compute_visibility};
pub use snapshot::{EnemyView, Ground, ItemView, PlayerView, Snapshot};
pub use state::{
    ActorState, AiBehavior, EntitiesState, EntityId, Fighter, FovSettings, GameMap, GameState,
    InitializationError, Inventory, ItemState, LevelStats, MapError, Message, MessageLog,
    PlacementError, Position, SessionMode, TileFlags, TurnState,
};
