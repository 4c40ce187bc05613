//! Authoritative session state.
//!
//! This module owns the map, the entity registry, turn bookkeeping and the
//! message log. Runtime layers clone or query this state but mutate it
//! exclusively through the engine.
pub mod error;
pub mod message;
pub mod types;

pub use error::{InitializationError, MapError, PlacementError};
pub use message::{Message, MessageLog};
pub use types::{
    ActorState, AiBehavior, EntitiesState, EntityId, Fighter, GameMap, Inventory, ItemState,
    LevelStats, Position, TileFlags, TurnState,
};

use crate::config::{FovMode, GameConfig};
use crate::engine::{GamePhase, Outcome};
use crate::env::{InitialEntityKind, LevelBlueprint};
use crate::fov::compute_visibility;

pub const WELCOME_MESSAGE: &str = "Hello and welcome, adventurer, to yet another dungeon!";

/// Where the session's levels come from.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SessionMode {
    /// Levels are generated on demand; taking the stairs descends.
    Procedural,
    /// A single level loaded from a map file; taking the stairs wins.
    Custom,
    /// A single level parsed from inline map text; taking the stairs wins.
    #[strum(serialize = "string")]
    #[cfg_attr(feature = "serde", serde(rename = "string"))]
    Text,
}

impl SessionMode {
    pub fn is_procedural(self) -> bool {
        matches!(self, SessionMode::Procedural)
    }
}

/// Field-of-view parameters fixed for the lifetime of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FovSettings {
    pub mode: FovMode,
    pub radius: u32,
}

impl FovSettings {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            mode: config.fov_mode,
            radius: config.fov_radius,
        }
    }
}

/// Root aggregate of one game session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Seed the session was started with. Level layouts derive from it.
    pub game_seed: u64,

    /// Sequential entity ID allocator (monotonically increasing).
    ///
    /// Never reused. ID 0 is reserved for the player.
    next_entity_id: u32,

    pub mode: SessionMode,
    pub fov: FovSettings,
    pub phase: GamePhase,
    pub outcome: Outcome,
    pub turn: TurnState,
    pub map: GameMap,
    pub entities: EntitiesState,
    pub messages: MessageLog,
}

impl GameState {
    /// Builds a playing session on the first level described by `blueprint`.
    pub fn from_blueprint(
        blueprint: &LevelBlueprint,
        mode: SessionMode,
        fov: FovSettings,
        game_seed: u64,
        config: &GameConfig,
    ) -> Result<Self, InitializationError> {
        let map = GameMap::from_blueprint(blueprint)?;
        let player = ActorState::player(map.spawn(), config.starting_potions);

        let mut state = Self {
            game_seed,
            next_entity_id: 1,
            mode,
            fov,
            phase: GamePhase::Playing,
            outcome: Outcome::None,
            turn: TurnState::new(),
            map,
            entities: EntitiesState::new(player),
            messages: MessageLog::new(config.message_capacity),
        };
        state.populate(blueprint, config)?;
        state.messages.push_text(WELCOME_MESSAGE);
        state.refresh_visibility();
        Ok(state)
    }

    /// Swaps in a new level: fresh map and entities, player moved to the new
    /// spawn. Player stats and turn bookkeeping are left to the caller.
    pub fn load_level(
        &mut self,
        blueprint: &LevelBlueprint,
        config: &GameConfig,
    ) -> Result<(), InitializationError> {
        let map = GameMap::from_blueprint(blueprint)?;
        self.entities.clear_level();
        self.map = map;
        self.entities.relocate(EntityId::PLAYER, self.map.spawn())?;
        self.populate(blueprint, config)?;
        self.refresh_visibility();
        Ok(())
    }

    pub fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn player(&self) -> &ActorState {
        self.entities.player()
    }

    pub fn is_procedural(&self) -> bool {
        self.mode.is_procedural()
    }

    /// Recomputes the player's field of view and applies it to the map.
    pub fn refresh_visibility(&mut self) {
        let viewpoint = self.entities.player().position;
        let visible = compute_visibility(&self.map, viewpoint, self.fov.mode, self.fov.radius);
        self.map.apply_visibility(&visible);
    }

    /// SHA-256 over the bincode encoding of the whole session.
    ///
    /// Two sessions replayed from the same seed and action sequence have the
    /// same root.
    #[cfg(feature = "serde")]
    pub fn state_root(&self) -> Result<[u8; 32], bincode::Error> {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self)?;
        Ok(Sha256::digest(&bytes).into())
    }

    fn populate(
        &mut self,
        blueprint: &LevelBlueprint,
        config: &GameConfig,
    ) -> Result<(), InitializationError> {
        for spec in &blueprint.entities {
            if !self.map.is_walkable(spec.position) {
                return Err(InitializationError::NotWalkable {
                    position: spec.position,
                });
            }
            let id = self.allocate_entity_id();
            match spec.kind {
                InitialEntityKind::Enemy(kind) => {
                    let enemy =
                        ActorState::enemy(id, spec.position, kind, config.chase_distance);
                    self.entities.spawn_enemy(enemy)?;
                }
                InitialEntityKind::Item(kind) => {
                    self.entities
                        .spawn_item(ItemState::new(id, spec.position, kind))?;
                }
            }
        }
        Ok(())
    }
}
