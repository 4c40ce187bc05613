//! State management errors.
//!
//! Errors raised while building a level or maintaining the entity registry.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, Position};

/// Layout invariants checked when a [`crate::state::GameMap`] is built.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapError {
    #[error("map has no tiles")]
    Empty,

    #[error("terrain has {actual} tiles but {width}x{height} needs {expected}")]
    DimensionMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("spawn {position:?} is outside the map or not a floor tile")]
    InvalidSpawn { position: Position },

    #[error("stairs {position:?} is outside the map or not a floor tile")]
    InvalidStairs { position: Position },

    #[error("spawn and stairs share the tile {position:?}")]
    SpawnOnStairs { position: Position },

    #[error("floor tile {position:?} is not reachable from the spawn")]
    Unreachable { position: Position },
}

impl GameError for MapError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use MapError::*;
        match self {
            Empty => "MAP_EMPTY",
            DimensionMismatch { .. } => "MAP_DIMENSION_MISMATCH",
            InvalidSpawn { .. } => "MAP_INVALID_SPAWN",
            InvalidStairs { .. } => "MAP_INVALID_STAIRS",
            SpawnOnStairs { .. } => "MAP_SPAWN_ON_STAIRS",
            Unreachable { .. } => "MAP_UNREACHABLE_FLOOR",
        }
    }
}

/// Errors raised by the entity registry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlacementError {
    /// A blocking entity already stands on the tile.
    #[error("position {position:?} is already occupied by entity {occupant}")]
    Occupied {
        position: Position,
        occupant: EntityId,
    },

    #[error("position {position:?} cannot hold more entities")]
    TileFull { position: Position },

    #[error("entity {0} is not registered")]
    UnknownEntity(EntityId),

    #[error("entity id {0} is already registered")]
    DuplicateId(EntityId),

    /// Occupancy index and entity positions disagree.
    #[error("occupancy desync for entity {entity} at {position:?}")]
    OccupancyDesync {
        entity: EntityId,
        position: Position,
    },
}

impl GameError for PlacementError {
    fn severity(&self) -> ErrorSeverity {
        use PlacementError::*;
        match self {
            Occupied { .. } | TileFull { .. } => ErrorSeverity::Validation,
            UnknownEntity(_) | DuplicateId(_) | OccupancyDesync { .. } => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use PlacementError::*;
        match self {
            Occupied { .. } => "STATE_POSITION_OCCUPIED",
            TileFull { .. } => "STATE_TILE_FULL",
            UnknownEntity(_) => "STATE_UNKNOWN_ENTITY",
            DuplicateId(_) => "STATE_DUPLICATE_ID",
            OccupancyDesync { .. } => "STATE_OCCUPANCY_DESYNC",
        }
    }
}

/// Errors raised while turning a blueprint into a playable level.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitializationError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("entity placed on non-walkable tile {position:?}")]
    NotWalkable { position: Position },
}

impl GameError for InitializationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            InitializationError::Map(error) => error.severity(),
            InitializationError::Placement(error) => error.severity(),
            InitializationError::NotWalkable { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            InitializationError::Map(error) => error.error_code(),
            InitializationError::Placement(error) => error.error_code(),
            InitializationError::NotWalkable { .. } => "INIT_NOT_WALKABLE",
        }
    }
}
