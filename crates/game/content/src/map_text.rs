//! ASCII map-text parser.
//!
//! Legend:
//!
//! | Char | Meaning |
//! |------|---------|
//! | `#` | wall |
//! | `.` | floor |
//! | ` ` | void |
//! | `@` | player spawn |
//! | `>` | stairs |
//! | `O` | ghost |
//! | `T` | red ghost |
//! | `h` | health potion |
//!
//! Spawn, stairs and entity cells are floor underneath.

use game_core::{
    EnemyKind, ErrorSeverity, GameError, GameMap, InitialEntitySpec, ItemKind, LevelBlueprint, MapDimensions, MapError,
    Position, TerrainKind,
};

pub const WALL: char = '#';
pub const FLOOR: char = '.';
pub const VOID: char = ' ';
pub const SPAWN: char = '@';
pub const STAIRS: char = '>';

/// Why a map text was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("map is empty")]
    Empty,

    #[error("map is not rectangular: row {row} has {actual} cells, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("unknown map character {glyph:?} at {position}")]
    UnknownGlyph { glyph: char, position: Position },

    #[error("map has no player spawn '@'")]
    MissingSpawn,

    #[error("map has a second player spawn at {position}")]
    DuplicateSpawn { position: Position },

    #[error("map has no stairs '>'")]
    MissingStairs,

    #[error("map has a second stairs tile at {position}")]
    DuplicateStairs { position: Position },

    #[error("floor at {position} is not reachable from the player spawn")]
    Unreachable { position: Position },

    #[error(transparent)]
    Map(MapError),
}

impl From<MapError> for ValidationError {
    fn from(error: MapError) -> Self {
        match error {
            MapError::Unreachable { position } => ValidationError::Unreachable { position },
            other => ValidationError::Map(other),
        }
    }
}

impl GameError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ValidationError::*;
        match self {
            Empty => "MAP_EMPTY",
            NotRectangular { .. } => "MAP_NOT_RECTANGULAR",
            UnknownGlyph { .. } => "MAP_UNKNOWN_GLYPH",
            MissingSpawn => "MAP_MISSING_SPAWN",
            DuplicateSpawn { .. } => "MAP_DUPLICATE_SPAWN",
            MissingStairs => "MAP_MISSING_STAIRS",
            DuplicateStairs { .. } => "MAP_DUPLICATE_STAIRS",
            Unreachable { .. } => "MAP_UNREACHABLE_FLOOR",
            Map(error) => error.error_code(),
        }
    }
}

/// Parses and validates map text into a level blueprint.
///
/// Trailing blank lines are ignored and `\r\n` line endings are accepted.
/// Entity placements come out in row-major order.
pub fn parse_map(text: &str) -> Result<LevelBlueprint, ValidationError> {
    let mut rows: Vec<&str> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    while rows.last().is_some_and(|row| row.trim().is_empty()) {
        rows.pop();
    }
    if rows.is_empty() {
        return Err(ValidationError::Empty);
    }

    let width = rows[0].chars().count();
    if width == 0 {
        return Err(ValidationError::Empty);
    }

    let mut terrain = Vec::with_capacity(width * rows.len());
    let mut spawn = None;
    let mut stairs = None;
    let mut entities = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        let actual = row.chars().count();
        if actual != width {
            return Err(ValidationError::NotRectangular {
                row: y,
                expected: width,
                actual,
            });
        }

        for (x, glyph) in row.chars().enumerate() {
            let position = Position::new(x as i32, y as i32);
            let tile = match glyph {
                WALL => TerrainKind::Wall,
                FLOOR => TerrainKind::Floor,
                VOID => TerrainKind::Void,
                SPAWN => {
                    if spawn.replace(position).is_some() {
                        return Err(ValidationError::DuplicateSpawn { position });
                    }
                    TerrainKind::Floor
                }
                STAIRS => {
                    if stairs.replace(position).is_some() {
                        return Err(ValidationError::DuplicateStairs { position });
                    }
                    TerrainKind::Floor
                }
                other => {
                    if let Some(kind) = EnemyKind::from_glyph(other) {
                        entities.push(InitialEntitySpec::enemy(position, kind));
                    } else if let Some(kind) = ItemKind::from_glyph(other) {
                        entities.push(InitialEntitySpec::item(position, kind));
                    } else {
                        return Err(ValidationError::UnknownGlyph {
                            glyph: other,
                            position,
                        });
                    }
                    TerrainKind::Floor
                }
            };
            terrain.push(tile);
        }
    }

    let blueprint = LevelBlueprint {
        dimensions: MapDimensions::new(width as u32, rows.len() as u32),
        terrain,
        spawn: spawn.ok_or(ValidationError::MissingSpawn)?,
        stairs: stairs.ok_or(ValidationError::MissingStairs)?,
        entities,
    };

    // Shape, placement and connectivity checks live with the map itself.
    GameMap::from_blueprint(&blueprint)?;
    Ok(blueprint)
}

#[cfg(test)]
mod tests {
    use game_core::InitialEntityKind;

    use super::*;

    #[test]
    fn parses_corridor() {
        let blueprint = parse_map("#####\n#@.>#\n#####").unwrap();
        assert_eq!(blueprint.dimensions, MapDimensions::new(5, 3));
        assert_eq!(blueprint.spawn, Position::new(1, 1));
        assert_eq!(blueprint.stairs, Position::new(3, 1));
        assert_eq!(
            blueprint.terrain_at(Position::new(2, 1)),
            Some(TerrainKind::Floor)
        );
        assert!(blueprint.entities.is_empty());
    }

    #[test]
    fn entities_are_row_major_on_floor() {
        let blueprint = parse_map("#######\n#@.T.h#\n#O...>#\n#######\n\n").unwrap();
        let kinds: Vec<(Position, InitialEntityKind)> = blueprint
            .entities
            .iter()
            .map(|spec| (spec.position, spec.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (
                    Position::new(3, 1),
                    InitialEntityKind::Enemy(EnemyKind::RedGhost)
                ),
                (
                    Position::new(5, 1),
                    InitialEntityKind::Item(ItemKind::HealthPotion)
                ),
                (Position::new(1, 2), InitialEntityKind::Enemy(EnemyKind::Ghost)),
            ]
        );
        assert_eq!(
            blueprint.terrain_at(Position::new(3, 1)),
            Some(TerrainKind::Floor)
        );
    }

    #[test]
    fn rejects_malformed_maps() {
        assert_eq!(parse_map(""), Err(ValidationError::Empty));
        assert_eq!(parse_map("\n\n"), Err(ValidationError::Empty));
        assert_eq!(
            parse_map("#####\n#@.>\n#####"),
            Err(ValidationError::NotRectangular {
                row: 1,
                expected: 5,
                actual: 4
            })
        );
        assert_eq!(
            parse_map("#####\n#@x>#\n#####"),
            Err(ValidationError::UnknownGlyph {
                glyph: 'x',
                position: Position::new(2, 1)
            })
        );
        assert_eq!(
            parse_map("#####\n#..>#\n#####"),
            Err(ValidationError::MissingSpawn)
        );
        assert_eq!(
            parse_map("#####\n#@.@#\n#>..#\n#####"),
            Err(ValidationError::DuplicateSpawn {
                position: Position::new(3, 1)
            })
        );
        assert_eq!(
            parse_map("#####\n#@..#\n#####"),
            Err(ValidationError::MissingStairs)
        );
        assert_eq!(
            parse_map("#####\n#@>>#\n#####"),
            Err(ValidationError::DuplicateStairs {
                position: Position::new(3, 1)
            })
        );
    }

    #[test]
    fn rejects_unreachable_floor() {
        let err = parse_map("######\n#@>#.#\n######").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Unreachable {
                position: Position::new(4, 1)
            }
        );
        assert_eq!(err.error_code(), "MAP_UNREACHABLE_FLOOR");
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn void_cells_are_allowed() {
        let blueprint = parse_map("  ###\n###.#\n#@.>#\n#####").unwrap();
        assert_eq!(
            blueprint.terrain_at(Position::new(0, 0)),
            Some(TerrainKind::Void)
        );
    }
}
