use game_core::Position;

/// Axis-aligned room. The outer ring `x1..=x2, y1..=y2` is wall, the rest is
/// floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
        }
    }

    pub fn center(&self) -> Position {
        Position::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Interior corner opposite the origin. Never the centre for rooms of
    /// size 3 or more.
    pub fn far_corner(&self) -> Position {
        Position::new(self.x2 - 1, self.y2 - 1)
    }

    pub fn inner(&self) -> impl Iterator<Item = Position> + '_ {
        (self.y1 + 1..self.y2)
            .flat_map(move |y| (self.x1 + 1..self.x2).map(move |x| Position::new(x, y)))
    }

    /// Rooms that touch, including sharing a wall, intersect.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }
}
