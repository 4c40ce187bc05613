//! Field-of-view computation.
//!
//! Partial mode casts a Bresenham ray from the viewpoint to every tile within
//! the Euclidean radius. A ray stops at the first opaque tile; that tile is
//! itself visible. The computation only reads the map, so identical inputs
//! always produce an identical [`VisibleSet`].

use crate::config::FovMode;
use crate::env::MapDimensions;
use crate::state::{GameMap, Position};

/// Row-major set of tiles visible from a viewpoint.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VisibleSet {
    dimensions: MapDimensions,
    cells: Vec<bool>,
}

impl VisibleSet {
    fn empty(dimensions: MapDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![false; dimensions.area()],
        }
    }

    fn insert(&mut self, position: Position) {
        if let Some(index) = self.dimensions.index(position) {
            self.cells[index] = true;
        }
    }

    pub fn contains(&self, position: Position) -> bool {
        self.dimensions
            .index(position)
            .is_some_and(|index| self.cells[index])
    }

    pub fn count(&self) -> usize {
        self.cells.iter().filter(|visible| **visible).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(|(index, _)| self.dimensions.position(index))
    }

    /// H×W boolean mask.
    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.cells
            .chunks(self.dimensions.width.max(1) as usize)
            .map(<[bool]>::to_vec)
            .collect()
    }
}

/// Computes the tiles visible from `viewpoint`.
///
/// With [`FovMode::All`] every tile is visible. With [`FovMode::Partial`] a
/// tile is visible when `dx² + dy² <= radius²` and the ray to it is not
/// blocked by an opaque tile in between.
pub fn compute_visibility(
    map: &GameMap,
    viewpoint: Position,
    mode: FovMode,
    radius: u32,
) -> VisibleSet {
    let dimensions = map.dimensions();
    let mut visible = VisibleSet::empty(dimensions);

    if mode == FovMode::All {
        visible.cells.fill(true);
        return visible;
    }
    if !map.contains(viewpoint) {
        return visible;
    }

    visible.insert(viewpoint);
    let radius_sq = u64::from(radius).saturating_mul(u64::from(radius));
    let r = radius.min(dimensions.width.max(dimensions.height)) as i32;

    for dy in -r..=r {
        for dx in -r..=r {
            if distance_sq(dx, dy) > radius_sq {
                continue;
            }
            let target = viewpoint.offset(dx, dy);
            if !map.contains(target) || visible.contains(target) {
                continue;
            }
            if is_line_clear(map, viewpoint, target) {
                visible.insert(target);
            }
        }
    }

    visible
}

fn distance_sq(dx: i32, dy: i32) -> u64 {
    let (dx, dy) = (u64::from(dx.unsigned_abs()), u64::from(dy.unsigned_abs()));
    dx * dx + dy * dy
}

/// Walks the Bresenham line from `from` to `to`; the line is clear when no
/// tile strictly between the endpoints is opaque.
fn is_line_clear(map: &GameMap, from: Position, to: Position) -> bool {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let mut current = from;

    loop {
        if current == to {
            return true;
        }
        if current != from && !map.is_transparent(current) {
            return false;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            current.x += sx;
        }
        if e2 <= dx {
            err += dx;
            current.y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{LevelBlueprint, TerrainKind};
    use proptest::prelude::*;

    fn map(rows: &[&str]) -> GameMap {
        let mut spawn = None;
        let mut stairs = None;
        let mut terrain = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                let position = Position::new(x as i32, y as i32);
                terrain.push(match c {
                    '#' => TerrainKind::Wall,
                    ' ' => TerrainKind::Void,
                    '@' => {
                        spawn = Some(position);
                        TerrainKind::Floor
                    }
                    '>' => {
                        stairs = Some(position);
                        TerrainKind::Floor
                    }
                    _ => TerrainKind::Floor,
                });
            }
        }
        let blueprint = LevelBlueprint {
            dimensions: MapDimensions::new(rows[0].len() as u32, rows.len() as u32),
            terrain,
            spawn: spawn.unwrap(),
            stairs: stairs.unwrap(),
            entities: Vec::new(),
        };
        GameMap::from_blueprint(&blueprint).unwrap()
    }

    const ROOMS: [&str; 7] = [
        "###########",
        "#@....#...#",
        "#.....#...#",
        "#.........#",
        "#.....#...#",
        "#.....#..>#",
        "###########",
    ];

    #[test]
    fn all_mode_sees_everything() {
        let map = map(&ROOMS);
        let visible = compute_visibility(&map, Position::new(1, 1), FovMode::All, 0);
        assert_eq!(visible.count(), map.dimensions().area());
    }

    #[test]
    fn walls_are_visible_but_block_what_is_behind() {
        let map = map(&["#########", "#@.#....#", "#...>...#", "#########"]);
        let visible = compute_visibility(&map, Position::new(1, 1), FovMode::Partial, 8);
        assert!(visible.contains(Position::new(3, 1)));
        assert!(!visible.contains(Position::new(4, 1)));
        assert!(!visible.contains(Position::new(7, 1)));
        assert!(visible.contains(Position::new(0, 0)));
    }

    #[test]
    fn radius_limits_visibility() {
        let map = map(&ROOMS);
        let visible = compute_visibility(&map, Position::new(1, 3), FovMode::Partial, 3);
        assert!(visible.contains(Position::new(4, 3)));
        assert!(!visible.contains(Position::new(5, 3)));
        // (3,2) is at distance² 5 <= 9
        assert!(visible.contains(Position::new(3, 2)));
        // (4,1) is at distance² 13 > 9
        assert!(!visible.contains(Position::new(4, 1)));
    }

    #[test]
    fn zero_radius_sees_only_the_viewpoint() {
        let map = map(&ROOMS);
        let visible = compute_visibility(&map, Position::new(2, 2), FovMode::Partial, 0);
        assert_eq!(visible.iter().collect::<Vec<_>>(), vec![Position::new(2, 2)]);
    }

    #[test]
    fn huge_radius_sees_the_whole_open_map() {
        let map = map(&["#####", "#@.>#", "#####"]);
        let visible = compute_visibility(&map, Position::new(1, 1), FovMode::Partial, u32::MAX);
        assert_eq!(visible.count(), map.dimensions().area());
    }

    #[test]
    fn mask_has_map_shape() {
        let map = map(&ROOMS);
        let rows = compute_visibility(&map, Position::new(1, 1), FovMode::Partial, 4).to_rows();
        assert_eq!(rows.len(), 7);
        assert!(rows.iter().all(|row| row.len() == 11));
        assert!(rows[1][1]);
    }

    proptest! {
        #[test]
        fn prop_visibility_is_deterministic(x in 1i32..10, y in 1i32..6, radius in 0u32..12) {
            let map = map(&ROOMS);
            let viewpoint = Position::new(x, y);
            let first = compute_visibility(&map, viewpoint, FovMode::Partial, radius);
            let second = compute_visibility(&map, viewpoint, FovMode::Partial, radius);
            prop_assert_eq!(&first, &second);
        }

        #[test]
        fn prop_nothing_beyond_radius(x in 1i32..10, y in 1i32..6, radius in 0u32..6) {
            let map = map(&ROOMS);
            let viewpoint = Position::new(x, y);
            let visible = compute_visibility(&map, viewpoint, FovMode::Partial, radius);
            for position in visible.iter() {
                let dx = i64::from(position.x - x);
                let dy = i64::from(position.y - y);
                prop_assert!(dx * dx + dy * dy <= i64::from(radius * radius));
            }
        }
    }
}
