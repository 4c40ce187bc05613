//! Procedural room-and-corridor dungeon generator.
//!
//! Rooms are placed at random and skipped when they overlap an existing
//! room. Each new room is joined to the previous one by an L-shaped tunnel,
//! so every floor tile is reachable from the first room. Walls are drawn
//! around all carved floor afterwards; everything else stays void.

mod room;
mod tables;

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use game_core::{
    InitialEntitySpec, LevelBlueprint, LevelOracle, MapDimensions, OracleError,
    Position, TerrainKind,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use room::Room;

/// Layout parameters of generated levels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationParams {
    pub width: u32,
    pub height: u32,
    pub max_rooms: u32,
    pub room_size: RangeInclusive<u32>,
}

impl GenerationParams {
    pub const DEFAULT_WIDTH: u32 = 30;
    pub const DEFAULT_HEIGHT: u32 = 30;
    pub const DEFAULT_MAX_ROOMS: u32 = 30;
    pub const DEFAULT_ROOM_MIN_SIZE: u32 = 4;
    pub const DEFAULT_ROOM_MAX_SIZE: u32 = 6;

    /// Smallest room that still has an interior corner apart from its centre.
    pub const MIN_ROOM_SIZE: u32 = 3;

    /// Per-level totals for generated enemies and items. Parsed maps are not limited.
    pub const MAX_ENEMIES: usize = 64;
    pub const MAX_ITEMS: usize = 128;

    fn validate(&self) -> Result<(), String> {
        let (min, max) = (*self.room_size.start(), *self.room_size.end());
        if min < Self::MIN_ROOM_SIZE {
            return Err(format!("room size must be at least {}", Self::MIN_ROOM_SIZE));
        }
        if min > max {
            return Err(format!("empty room size range {min}..={max}"));
        }
        if self.width <= max || self.height <= max {
            return Err(format!(
                "{}x{} map cannot hold a room of size {max}",
                self.width, self.height
            ));
        }
        if self.max_rooms == 0 {
            return Err("max_rooms must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            max_rooms: Self::DEFAULT_MAX_ROOMS,
            room_size: Self::DEFAULT_ROOM_MIN_SIZE..=Self::DEFAULT_ROOM_MAX_SIZE,
        }
    }
}

/// Seeded level generator used by procedural sessions.
#[derive(Clone, Debug, Default)]
pub struct DungeonGenerator {
    params: GenerationParams,
}

impl DungeonGenerator {
    pub fn new(params: GenerationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Builds the level for `dungeon_level` from `seed`. Same inputs, same level.
    pub fn build(&self, dungeon_level: u32, seed: u64) -> Result<LevelBlueprint, OracleError> {
        let failed = |reason: String| OracleError::GenerationFailed {
            dungeon_level,
            reason,
        };
        self.params.validate().map_err(failed)?;

        let mut rng = StdRng::seed_from_u64(seed);
        let dimensions = MapDimensions::new(self.params.width, self.params.height);
        let mut terrain = vec![TerrainKind::Void; dimensions.area()];
        let rooms = self.carve_rooms(&mut rng, dimensions, &mut terrain);

        let (Some(first), Some(last)) = (rooms.first(), rooms.last()) else {
            return Err(failed("no room could be placed".to_string()));
        };
        let spawn = first.center();
        let stairs = if rooms.len() == 1 {
            first.far_corner()
        } else {
            last.center()
        };

        surround_with_walls(dimensions, &mut terrain);
        let entities = place_entities(&mut rng, &rooms, dungeon_level, spawn, stairs);

        Ok(LevelBlueprint {
            dimensions,
            terrain,
            spawn,
            stairs,
            entities,
        })
    }

    fn carve_rooms(
        &self,
        rng: &mut StdRng,
        dimensions: MapDimensions,
        terrain: &mut [TerrainKind],
    ) -> Vec<Room> {
        let mut rooms: Vec<Room> = Vec::new();
        let (min, max) = (
            *self.params.room_size.start() as i32,
            *self.params.room_size.end() as i32,
        );
        let (width, height) = (dimensions.width as i32, dimensions.height as i32);

        for _ in 0..self.params.max_rooms {
            let room_width = rng.gen_range(min..=max);
            let room_height = rng.gen_range(min..=max);
            let x = rng.gen_range(0..width - room_width);
            let y = rng.gen_range(0..height - room_height);
            let room = Room::new(x, y, room_width, room_height);

            if rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }

            for position in room.inner() {
                set(dimensions, terrain, position, TerrainKind::Floor);
            }
            if let Some(previous) = rooms.last() {
                for position in tunnel_between(rng, previous.center(), room.center()) {
                    set(dimensions, terrain, position, TerrainKind::Floor);
                }
            }
            rooms.push(room);
        }
        rooms
    }
}

impl LevelOracle for DungeonGenerator {
    fn generate(&self, dungeon_level: u32, seed: u64) -> Result<LevelBlueprint, OracleError> {
        self.build(dungeon_level, seed)
    }
}

fn set(dimensions: MapDimensions, terrain: &mut [TerrainKind], position: Position, kind: TerrainKind) {
    if let Some(index) = dimensions.index(position) {
        terrain[index] = kind;
    }
}

/// Horizontal-then-vertical or vertical-then-horizontal, chosen by coin flip.
fn tunnel_between(rng: &mut StdRng, start: Position, end: Position) -> Vec<Position> {
    let corner = if rng.gen_bool(0.5) {
        Position::new(end.x, start.y)
    } else {
        Position::new(start.x, end.y)
    };
    let mut path = straight_line(start, corner);
    path.extend(straight_line(corner, end));
    path
}

fn straight_line(from: Position, to: Position) -> Vec<Position> {
    let (dx, dy) = ((to.x - from.x).signum(), (to.y - from.y).signum());
    let mut path = vec![from];
    let mut current = from;
    while current != to {
        current = current.offset(dx, dy);
        path.push(current);
    }
    path
}

fn surround_with_walls(dimensions: MapDimensions, terrain: &mut [TerrainKind]) {
    let floors: Vec<Position> = terrain
        .iter()
        .enumerate()
        .filter(|(_, kind)| **kind == TerrainKind::Floor)
        .map(|(index, _)| dimensions.position(index))
        .collect();

    for floor in floors {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let neighbour = floor.offset(dx, dy);
                match dimensions.index(neighbour) {
                    Some(index) if terrain[index] == TerrainKind::Void => {
                        terrain[index] = TerrainKind::Wall;
                    }
                    _ => {}
                }
            }
        }
    }
}

fn place_entities(
    rng: &mut StdRng,
    rooms: &[Room],
    dungeon_level: u32,
    spawn: Position,
    stairs: Position,
) -> Vec<InitialEntitySpec> {
    let mut taken: BTreeSet<Position> = [spawn, stairs].into_iter().collect();
    let mut entities = Vec::new();
    let (mut enemies, mut items) = (0usize, 0usize);

    for room in rooms {
        let enemy_count = rng.gen_range(0..=tables::max_enemies_per_room(dungeon_level));
        let item_count = rng.gen_range(0..=tables::max_items_per_room(dungeon_level));

        for _ in 0..enemy_count {
            let kind = tables::pick_enemy(rng, dungeon_level);
            let position = random_inner(rng, room);
            let Some(kind) = kind else { continue };
            if enemies < GenerationParams::MAX_ENEMIES && taken.insert(position) {
                entities.push(InitialEntitySpec::enemy(position, kind));
                enemies += 1;
            }
        }
        for _ in 0..item_count {
            let kind = tables::pick_item(rng, dungeon_level);
            let position = random_inner(rng, room);
            let Some(kind) = kind else { continue };
            if items < GenerationParams::MAX_ITEMS && taken.insert(position) {
                entities.push(InitialEntitySpec::item(position, kind));
                items += 1;
            }
        }
    }
    entities
}

fn random_inner(rng: &mut StdRng, room: &Room) -> Position {
    Position::new(
        rng.gen_range(room.x1 + 1..room.x2),
        rng.gen_range(room.y1 + 1..room.y2),
    )
}

#[cfg(test)]
mod tests {
    use game_core::{GameMap, InitialEntityKind};
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn same_seed_same_level() {
        let generator = DungeonGenerator::default();
        assert_eq!(generator.build(1, 99).unwrap(), generator.build(1, 99).unwrap());
        assert_ne!(generator.build(1, 99).unwrap(), generator.build(1, 100).unwrap());
    }

    #[test]
    fn default_level_is_a_valid_map() {
        let blueprint = DungeonGenerator::default().generate(1, 7).unwrap();
        assert_eq!(blueprint.dimensions, MapDimensions::new(30, 30));
        let map = GameMap::from_blueprint(&blueprint).unwrap();
        assert!(map.is_walkable(blueprint.spawn));
        assert!(map.is_stairs(blueprint.stairs));
    }

    #[test]
    fn single_room_puts_stairs_in_a_corner() {
        let generator = DungeonGenerator::new(GenerationParams {
            width: 8,
            height: 8,
            max_rooms: 1,
            room_size: 5..=5,
        });
        let blueprint = generator.build(1, 3).unwrap();
        assert_ne!(blueprint.spawn, blueprint.stairs);
        assert_eq!(
            blueprint.stairs,
            Position::new(blueprint.spawn.x + 2, blueprint.spawn.y + 2)
        );
        GameMap::from_blueprint(&blueprint).unwrap();
    }

    #[test]
    fn invalid_params_fail_generation() {
        let generator = DungeonGenerator::new(GenerationParams {
            width: 5,
            height: 30,
            max_rooms: 10,
            room_size: 4..=6,
        });
        assert!(matches!(
            generator.build(2, 0),
            Err(OracleError::GenerationFailed { dungeon_level: 2, .. })
        ));
    }

    #[test]
    fn entities_never_start_on_spawn_or_stairs() {
        let generator = DungeonGenerator::default();
        for seed in 0..20 {
            let blueprint = generator.build(6, seed).unwrap();
            let mut seen = BTreeSet::new();
            for spec in &blueprint.entities {
                assert_ne!(spec.position, blueprint.spawn);
                assert_ne!(spec.position, blueprint.stairs);
                assert!(seen.insert(spec.position));
            }
        }
    }

    #[test]
    fn shallow_floors_have_no_red_ghosts() {
        let generator = DungeonGenerator::default();
        for seed in 0..20 {
            let blueprint = generator.build(1, seed).unwrap();
            assert!(blueprint.entities.iter().all(|spec| !matches!(
                spec.kind,
                InitialEntityKind::Enemy(game_core::EnemyKind::RedGhost)
            )));
        }
    }

    proptest! {
        #[test]
        fn prop_generated_levels_are_connected(seed in any::<u64>(), level in 1u32..12) {
            let blueprint = DungeonGenerator::default().build(level, seed).unwrap();
            // from_blueprint flood-fills from spawn and rejects any unreachable floor
            prop_assert!(GameMap::from_blueprint(&blueprint).is_ok());

            let enemies = blueprint
                .entities
                .iter()
                .filter(|spec| matches!(spec.kind, InitialEntityKind::Enemy(_)))
                .count();
            prop_assert!(enemies <= GenerationParams::MAX_ENEMIES);
        }
    }
}
