use std::collections::VecDeque;

use bitflags::bitflags;

use super::Position;
use crate::env::{LevelBlueprint, MapDimensions, TerrainKind};
use crate::fov::VisibleSet;
use crate::state::MapError;

bitflags! {
    /// Per-tile visibility bookkeeping.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct TileFlags: u8 {
        /// Inside the field of view computed at the end of the last turn.
        const VISIBLE = 1 << 0;
        /// Has been visible at least once. Never cleared.
        const DISCOVERED = 1 << 1;
    }
}

/// Terrain grid of the current level plus its visibility bitmaps.
///
/// Terrain never changes after construction; only [`TileFlags`] do.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameMap {
    dimensions: MapDimensions,
    terrain: Vec<TerrainKind>,
    flags: Vec<TileFlags>,
    spawn: Position,
    stairs: Position,
}

impl GameMap {
    /// Builds a map from a blueprint, enforcing the layout invariants:
    /// matching dimensions, spawn and stairs on distinct floor tiles, and every
    /// floor tile reachable from the spawn.
    pub fn from_blueprint(blueprint: &LevelBlueprint) -> Result<Self, MapError> {
        let dimensions = blueprint.dimensions;
        if dimensions.area() == 0 {
            return Err(MapError::Empty);
        }
        if blueprint.terrain.len() != dimensions.area() {
            return Err(MapError::DimensionMismatch {
                width: dimensions.width,
                height: dimensions.height,
                expected: dimensions.area(),
                actual: blueprint.terrain.len(),
            });
        }

        let map = Self {
            dimensions,
            terrain: blueprint.terrain.clone(),
            flags: vec![TileFlags::empty(); dimensions.area()],
            spawn: blueprint.spawn,
            stairs: blueprint.stairs,
        };

        if !map.is_walkable(map.spawn) {
            return Err(MapError::InvalidSpawn {
                position: map.spawn,
            });
        }
        if !map.is_walkable(map.stairs) {
            return Err(MapError::InvalidStairs {
                position: map.stairs,
            });
        }
        if map.spawn == map.stairs {
            return Err(MapError::SpawnOnStairs {
                position: map.spawn,
            });
        }

        let reachable = map.reachable_from(map.spawn);
        if let Some(index) = map
            .terrain
            .iter()
            .zip(&reachable)
            .position(|(terrain, reached)| terrain.is_walkable() && !reached)
        {
            return Err(MapError::Unreachable {
                position: dimensions.position(index),
            });
        }

        Ok(map)
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    pub fn stairs(&self) -> Position {
        self.stairs
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions.contains(position)
    }

    /// Terrain at `position`, or `None` outside the map.
    pub fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.dimensions
            .index(position)
            .map(|index| self.terrain[index])
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.terrain(position).is_some_and(TerrainKind::is_walkable)
    }

    pub fn is_transparent(&self, position: Position) -> bool {
        self.terrain(position)
            .is_some_and(TerrainKind::is_transparent)
    }

    pub fn is_stairs(&self, position: Position) -> bool {
        self.stairs == position
    }

    pub fn flags(&self, position: Position) -> TileFlags {
        self.dimensions
            .index(position)
            .map(|index| self.flags[index])
            .unwrap_or_default()
    }

    pub fn is_visible(&self, position: Position) -> bool {
        self.flags(position).contains(TileFlags::VISIBLE)
    }

    pub fn is_discovered(&self, position: Position) -> bool {
        self.flags(position).contains(TileFlags::DISCOVERED)
    }

    /// Replaces the visible bitmap with `visible` and marks those tiles
    /// discovered. Previously discovered tiles stay discovered.
    pub fn apply_visibility(&mut self, visible: &VisibleSet) {
        for (index, flags) in self.flags.iter_mut().enumerate() {
            let position = self.dimensions.position(index);
            if visible.contains(position) {
                flags.insert(TileFlags::VISIBLE | TileFlags::DISCOVERED);
            } else {
                flags.remove(TileFlags::VISIBLE);
            }
        }
    }

    pub fn visible_rows(&self) -> Vec<Vec<bool>> {
        self.flag_rows(TileFlags::VISIBLE)
    }

    pub fn discovered_rows(&self) -> Vec<Vec<bool>> {
        self.flag_rows(TileFlags::DISCOVERED)
    }

    /// 4-connected flood fill over walkable tiles. Returns a row-major mask.
    pub fn reachable_from(&self, origin: Position) -> Vec<bool> {
        let mut reached = vec![false; self.dimensions.area()];
        let Some(start) = self.dimensions.index(origin) else {
            return reached;
        };
        if !self.terrain[start].is_walkable() {
            return reached;
        }

        let mut queue = VecDeque::from([origin]);
        reached[start] = true;
        while let Some(current) = queue.pop_front() {
            for (dx, dy) in [(0, -1), (0, 1), (1, 0), (-1, 0)] {
                let next = current.offset(dx, dy);
                let Some(index) = self.dimensions.index(next) else {
                    continue;
                };
                if !reached[index] && self.terrain[index].is_walkable() {
                    reached[index] = true;
                    queue.push_back(next);
                }
            }
        }
        reached
    }

    fn flag_rows(&self, flag: TileFlags) -> Vec<Vec<bool>> {
        self.flags
            .chunks(self.dimensions.width as usize)
            .map(|row| row.iter().map(|flags| flags.contains(flag)).collect())
            .collect()
    }
}
