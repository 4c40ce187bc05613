use crate::env::{EnemyKind, ItemKind};
use crate::state::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of `position`, or `None` when it lies outside the map.
    pub fn index(&self, position: Position) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn position(&self, index: usize) -> Position {
        let width = self.width.max(1) as usize;
        Position::new((index % width) as i32, (index / width) as i32)
    }
}

/// Base terrain of a tile. Stairs are tracked by position on the map, the
/// tile underneath is floor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    Floor,
    Wall,
    /// Unused space outside the carved dungeon.
    #[default]
    Void,
}

impl TerrainKind {
    pub fn is_walkable(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }

    pub fn is_transparent(self) -> bool {
        matches!(self, TerrainKind::Floor)
    }
}

/// Entity placed on a blueprint before the session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialEntitySpec {
    pub position: Position,
    pub kind: InitialEntityKind,
}

impl InitialEntitySpec {
    pub fn enemy(position: Position, kind: EnemyKind) -> Self {
        Self {
            position,
            kind: InitialEntityKind::Enemy(kind),
        }
    }

    pub fn item(position: Position, kind: ItemKind) -> Self {
        Self {
            position,
            kind: InitialEntityKind::Item(kind),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitialEntityKind {
    Enemy(EnemyKind),
    Item(ItemKind),
}

/// Validated-by-construction input for a level: terrain, spawn, stairs and
/// entity placements.
///
/// Producers (map-text parser, procedural generator) are expected to hand over
/// well-formed blueprints; [`crate::state::GameMap::from_blueprint`] still
/// checks the layout invariants before a session is built on top of it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelBlueprint {
    pub dimensions: MapDimensions,
    /// Row-major terrain, `width * height` entries.
    pub terrain: Vec<TerrainKind>,
    pub spawn: Position,
    pub stairs: Position,
    /// Entities in registration order.
    pub entities: Vec<InitialEntitySpec>,
}

impl LevelBlueprint {
    pub fn terrain_at(&self, position: Position) -> Option<TerrainKind> {
        self.dimensions
            .index(position)
            .and_then(|index| self.terrain.get(index).copied())
    }
}
