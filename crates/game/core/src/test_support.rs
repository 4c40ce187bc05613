//! Builders shared by unit tests.

use crate::config::GameConfig;
use crate::env::{
    EnemyKind, InitialEntitySpec, ItemKind, LevelBlueprint, MapDimensions, TerrainKind,
};
use crate::state::{FovSettings, GameState, Position, SessionMode};

/// Blueprint from map text using the standard legend.
pub(crate) fn blueprint_from_rows(rows: &[&str]) -> LevelBlueprint {
    let mut spawn = Position::ORIGIN;
    let mut stairs = Position::ORIGIN;
    let mut terrain = Vec::new();
    let mut entities = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, glyph) in row.chars().enumerate() {
            let position = Position::new(x as i32, y as i32);
            let tile = match glyph {
                '#' => TerrainKind::Wall,
                ' ' => TerrainKind::Void,
                '@' => {
                    spawn = position;
                    TerrainKind::Floor
                }
                '>' => {
                    stairs = position;
                    TerrainKind::Floor
                }
                other => {
                    if let Some(kind) = EnemyKind::from_glyph(other) {
                        entities.push(InitialEntitySpec::enemy(position, kind));
                    } else if let Some(kind) = ItemKind::from_glyph(other) {
                        entities.push(InitialEntitySpec::item(position, kind));
                    }
                    TerrainKind::Floor
                }
            };
            terrain.push(tile);
        }
    }
    LevelBlueprint {
        dimensions: MapDimensions::new(rows[0].chars().count() as u32, rows.len() as u32),
        terrain,
        spawn,
        stairs,
        entities,
    }
}

pub(crate) fn state_from_rows(rows: &[&str], mode: SessionMode) -> GameState {
    let config = GameConfig::default();
    GameState::from_blueprint(
        &blueprint_from_rows(rows),
        mode,
        FovSettings::from_config(&config),
        7,
        &config,
    )
    .expect("test map is valid")
}
