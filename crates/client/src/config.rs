//! Client configuration loaded from the process environment.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use game_core::{FovMode, SessionMode};
use runtime::{MapSource, RuntimeConfig, StartRequest};

/// How snapshots are written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub mode: SessionMode,
    pub map_file: Option<PathBuf>,
    pub map_text: Option<String>,
    pub fov_mode: Option<FovMode>,
    pub fov_radius: Option<u32>,
    pub seed: u64,
    pub turn_timeout: Option<Duration>,
    pub output: OutputFormat,
    /// Directory for `dungeon.log`; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::Procedural,
            map_file: None,
            map_text: None,
            fov_mode: None,
            fov_radius: None,
            seed: 0,
            turn_timeout: None,
            output: OutputFormat::default(),
            log_dir: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DUNGEON_MODE` - `procedural` (default), `custom` or `string`
    /// - `DUNGEON_MAP_FILE` - Map file for custom sessions
    /// - `DUNGEON_MAP` - Inline map text for string sessions (`\n` escapes allowed)
    /// - `DUNGEON_FOV_MODE` - `partial` or `all`
    /// - `DUNGEON_FOV_RADIUS` - FOV radius in tiles
    /// - `DUNGEON_SEED` - World seed (random when unset)
    /// - `DUNGEON_TURN_TIMEOUT_MS` - How long a submission waits for its turn
    /// - `DUNGEON_OUTPUT` - `text` (default) or `json`
    /// - `DUNGEON_LOG_DIR` - Also write logs to `dungeon.log` in this directory
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Just the log directory, for installing logging before the full load.
    pub fn log_dir_from_env() -> Option<PathBuf> {
        Self::log_dir_from(|key| env::var(key).ok())
    }

    fn log_dir_from(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
        lookup("DUNGEON_LOG_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary variable source.
    ///
    /// Malformed values are logged and left at their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(mode) = parse_var(&lookup, "DUNGEON_MODE") {
            config.mode = mode;
        }
        config.map_file = lookup("DUNGEON_MAP_FILE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        config.map_text = lookup("DUNGEON_MAP").map(|text| text.replace("\\n", "\n"));
        config.fov_mode = parse_var(&lookup, "DUNGEON_FOV_MODE");
        config.fov_radius = parse_var(&lookup, "DUNGEON_FOV_RADIUS");
        config.seed = parse_var(&lookup, "DUNGEON_SEED").unwrap_or_else(rand::random);
        config.turn_timeout =
            parse_var::<u64>(&lookup, "DUNGEON_TURN_TIMEOUT_MS").map(Duration::from_millis);
        if let Some(output) = parse_var(&lookup, "DUNGEON_OUTPUT") {
            config.output = output;
        }
        config.log_dir = Self::log_dir_from(&lookup);

        config
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        if let Some(timeout) = self.turn_timeout {
            config.turn_timeout = timeout;
        }
        config
    }

    /// Start request for `mode` using the configured map and FOV settings.
    pub fn start_request(&self, mode: SessionMode) -> StartRequest {
        let mut request = StartRequest::new(mode).with_seed(self.seed);
        let source = match mode {
            SessionMode::Procedural => None,
            SessionMode::Custom => self.map_file.clone().map(MapSource::File),
            SessionMode::Text => self.map_text.clone().map(MapSource::Text),
        };
        request.map_source = source;
        request.fov_mode = self.fov_mode;
        request.fov_radius = self.fov_radius;
        request
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(target: "client", key, value = %raw, error = %err, "ignoring malformed environment variable");
            None
        }
    }
}
