//! Read-only facts the engine consults while resolving actions.
//!
//! Level layouts arrive as [`LevelBlueprint`]s, either parsed from map text or
//! produced on demand by a [`LevelOracle`]. The [`GameEnv`] aggregate bundles
//! the configuration and the optional oracle so actions can reach everything
//! they need without hard coupling to concrete implementations.
mod actors;
mod error;
mod map;
mod rng;

pub use actors::{ActorTemplate, EnemyKind, ItemKind};
pub use error::OracleError;
pub use map::{InitialEntityKind, InitialEntitySpec, LevelBlueprint, MapDimensions, TerrainKind};
pub use rng::{LEVEL_SEED_CONTEXT, compute_seed};

use crate::config::GameConfig;

/// Produces the layout of a dungeon level on demand.
///
/// Implementations must be deterministic: the same `(dungeon_level, seed)`
/// pair always yields the same blueprint.
pub trait LevelOracle: Send + Sync {
    fn generate(&self, dungeon_level: u32, seed: u64) -> Result<LevelBlueprint, OracleError>;
}

/// Aggregates the configuration and oracles required by the action pipeline.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    config: &'a GameConfig,
    levels: Option<&'a dyn LevelOracle>,
}

impl<'a> GameEnv<'a> {
    pub fn new(config: &'a GameConfig) -> Self {
        Self {
            config,
            levels: None,
        }
    }

    pub fn with_levels(mut self, levels: &'a dyn LevelOracle) -> Self {
        self.levels = Some(levels);
        self
    }

    pub fn config(&self) -> &'a GameConfig {
        self.config
    }

    /// Returns the level oracle, or an error if the session has none.
    pub fn levels(&self) -> Result<&'a dyn LevelOracle, OracleError> {
        self.levels.ok_or(OracleError::LevelsNotAvailable)
    }
}

impl core::fmt::Debug for GameEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameEnv")
            .field("config", self.config)
            .field("levels", &self.levels.is_some())
            .finish()
    }
}
