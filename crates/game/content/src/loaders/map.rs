//! Custom map file loader.
//!
//! Map files use the same ASCII legend as inline map text.

use std::path::Path;

use anyhow::Context;
use game_core::LevelBlueprint;

use crate::loaders::{LoadResult, read_file};
use crate::map_text::parse_map;

/// Loader for custom map files.
pub struct MapLoader;

impl MapLoader {
    /// Load and validate a level from a UTF-8 map file.
    pub fn load(path: &Path) -> LoadResult<LevelBlueprint> {
        let content = read_file(path)?;
        parse_map(&content).with_context(|| format!("Invalid map file {}", path.display()))
    }
}

pub fn load_map_file(path: impl AsRef<Path>) -> LoadResult<LevelBlueprint> {
    MapLoader::load(path.as_ref())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use game_core::Position;

    use super::*;
    use crate::map_text::ValidationError;

    #[test]
    fn loads_map_file_with_crlf_line_endings() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "######\r\n#@.h>#\r\n######\r\n").unwrap();

        let blueprint = load_map_file(file.path()).unwrap();
        assert_eq!(blueprint.spawn, Position::new(1, 1));
        assert_eq!(blueprint.stairs, Position::new(4, 1));
        assert_eq!(blueprint.entities.len(), 1);
    }

    #[test]
    fn invalid_file_keeps_the_validation_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#####\n#..>#\n#####\n").unwrap();

        let err = load_map_file(file.path()).unwrap_err();
        assert!(err.to_string().starts_with("Invalid map file"));
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::MissingSpawn)
        );
    }

    #[test]
    fn missing_file_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom_map.txt");

        let err = load_map_file(&path).unwrap_err();
        assert!(err.to_string().contains("custom_map.txt"));
    }
}
