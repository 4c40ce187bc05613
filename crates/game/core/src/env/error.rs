//! Oracle access errors.

use crate::error::{ErrorSeverity, GameError};

/// Errors that occur when consulting an oracle.
///
/// The engine cannot continue a level transition without a layout, so these
/// abort the current turn.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OracleError {
    /// LevelOracle is not available in the environment.
    #[error("LevelOracle not available")]
    LevelsNotAvailable,

    /// The oracle could not produce a valid level.
    #[error("level {dungeon_level} could not be generated: {reason}")]
    GenerationFailed { dungeon_level: u32, reason: String },
}

impl GameError for OracleError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            OracleError::LevelsNotAvailable => "ORACLE_LEVELS_NOT_AVAILABLE",
            OracleError::GenerationFailed { .. } => "ORACLE_GENERATION_FAILED",
        }
    }
}
