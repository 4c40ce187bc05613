//! Start-game parameters.

use std::path::PathBuf;

use game_core::{FovMode, SessionMode};
use serde::{Deserialize, Serialize};

/// Where a non-procedural session reads its level from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapSource {
    /// Inline map text.
    Text(String),
    /// Path to a map file.
    File(PathBuf),
}

/// Everything needed to start (or restart) a session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    pub mode: SessionMode,
    pub map_source: Option<MapSource>,
    /// Falls back to the runtime's game config when unset.
    pub fov_mode: Option<FovMode>,
    pub fov_radius: Option<u32>,
    pub seed: u64,
}

impl StartRequest {
    pub fn new(mode: SessionMode) -> Self {
        Self {
            mode,
            map_source: None,
            fov_mode: None,
            fov_radius: None,
            seed: 0,
        }
    }

    pub fn procedural(seed: u64) -> Self {
        Self::new(SessionMode::Procedural).with_seed(seed)
    }

    /// A `string` session over inline map text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(SessionMode::Text).with_map(MapSource::Text(text.into()))
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(SessionMode::Custom).with_map(MapSource::File(path.into()))
    }

    pub fn with_map(mut self, source: MapSource) -> Self {
        self.map_source = Some(source);
        self
    }

    pub fn with_fov(mut self, mode: FovMode, radius: u32) -> Self {
        self.fov_mode = Some(mode);
        self.fov_radius = Some(radius);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
