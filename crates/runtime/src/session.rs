//! Session construction.
//!
//! A start request is resolved into a complete [`ActiveSession`] off to the
//! side; the worker swaps it in only once it built cleanly.

use std::path::Path;

use game_content::{DungeonGenerator, load_map_file, parse_map};
use game_core::{
    FovSettings, GameConfig, GameEnv, GameState, LEVEL_SEED_CONTEXT, LevelBlueprint, SessionMode,
    compute_seed,
};

use crate::api::{MapSource, Result, StartError, StartRequest};

/// The one live session plus the level source it descends through.
#[derive(Debug)]
pub struct ActiveSession {
    pub state: GameState,
    levels: Option<DungeonGenerator>,
}

impl ActiveSession {
    /// Builds a session from `request`.
    ///
    /// Every failure is a [`crate::RuntimeError::Validation`].
    pub fn start(
        request: &StartRequest,
        config: &GameConfig,
        default_map_path: &Path,
        generator: &DungeonGenerator,
    ) -> Result<Self> {
        let fov = FovSettings {
            mode: request.fov_mode.unwrap_or(config.fov_mode),
            radius: request.fov_radius.unwrap_or(config.fov_radius),
        };

        let (blueprint, levels) = match request.mode {
            SessionMode::Procedural => {
                if request.map_source.is_some() {
                    return Err(StartError::UnexpectedMapSource.into());
                }
                let seed = compute_seed(request.seed, 1, 0, LEVEL_SEED_CONTEXT);
                let blueprint = generator.build(1, seed).map_err(StartError::from)?;
                (blueprint, Some(generator.clone()))
            }
            SessionMode::Custom => {
                let blueprint = match &request.map_source {
                    Some(MapSource::Text(text)) => parse_text(text)?,
                    Some(MapSource::File(path)) => load_file(path)?,
                    None => load_file(default_map_path)?,
                };
                (blueprint, None)
            }
            SessionMode::Text => match &request.map_source {
                Some(MapSource::Text(text)) => (parse_text(text)?, None),
                _ => {
                    return Err(StartError::MissingMapText.into());
                }
            },
        };

        let state = GameState::from_blueprint(&blueprint, request.mode, fov, request.seed, config)
            .map_err(StartError::from)?;

        Ok(Self { state, levels })
    }

    /// Environment the engine runs this session's turns against.
    pub fn env<'a>(&'a self, config: &'a GameConfig) -> GameEnv<'a> {
        let env = GameEnv::new(config);
        match &self.levels {
            Some(levels) => env.with_levels(levels),
            None => env,
        }
    }
}

fn parse_text(text: &str) -> Result<LevelBlueprint> {
    Ok(parse_map(text).map_err(StartError::from)?)
}

fn load_file(path: &Path) -> Result<LevelBlueprint> {
    Ok(load_map_file(path).map_err(StartError::MapFile)?)
}
