//! Level content for the dungeon crawler.
//!
//! This crate turns external level sources into [`game_core::LevelBlueprint`]s:
//! - ASCII map text (inline strings and custom map files)
//! - The procedural room-and-corridor generator used by procedural sessions
//!
//! Content is consumed when a session starts or descends and never appears in
//! game state directly.

pub mod generator;
pub mod map_text;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use generator::{DungeonGenerator, GenerationParams};
pub use map_text::{ValidationError, parse_map};

#[cfg(feature = "loaders")]
pub use loaders::{LoadResult, MapLoader, load_map_file};
