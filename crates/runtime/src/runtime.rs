//! Runtime orchestrator and builder.
//!
//! [`Runtime`] spawns the session worker and hands out [`SessionHandle`]s.
//! Dropping every handle (or calling [`Runtime::shutdown`]) stops the worker.
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use game_content::GenerationParams;
use game_core::{GameConfig, Snapshot};

use crate::api::{Result, RuntimeError, SessionHandle};
use crate::events::EventBus;
use crate::workers::{Command, SessionWorker};

/// Runtime configuration shared across the orchestrator and the worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game: GameConfig,
    pub generation: GenerationParams,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// How long `submit_action` waits for a turn before returning the last snapshot.
    pub turn_timeout: Duration,
    /// Map file used by custom sessions that do not name one.
    pub default_map_path: PathBuf,
}

impl RuntimeConfig {
    pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_millis(500);
    pub const DEFAULT_MAP_PATH: &'static str = "custom_map.txt";
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            generation: GenerationParams::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            turn_timeout: Self::DEFAULT_TURN_TIMEOUT,
            default_map_path: PathBuf::from(Self::DEFAULT_MAP_PATH),
        }
    }
}

/// Owns the session worker.
///
/// [`SessionHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: SessionHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Drops the runtime's handle and waits for the worker to exit.
    ///
    /// The worker keeps running while clones of the handle are alive.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn game_config(mut self, game: GameConfig) -> Self {
        self.config.game = game;
        self
    }

    pub fn generation(mut self, generation: GenerationParams) -> Self {
        self.config.generation = generation;
        self
    }

    pub fn turn_timeout(mut self, timeout: Duration) -> Self {
        self.config.turn_timeout = timeout;
        self
    }

    pub fn default_map_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.default_map_path = path.into();
        self
    }

    /// Spawns the session worker. Must be called inside a tokio runtime.
    pub async fn build(self) -> Result<Runtime> {
        if self.config.command_buffer_size == 0 {
            return Err(RuntimeError::Config("command buffer size must be non-zero"));
        }

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (snapshot_tx, snapshot_rx) = watch::channel::<Option<Arc<Snapshot>>>(None);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = SessionHandle::new(
            command_tx,
            event_bus.clone(),
            snapshot_rx,
            self.config.turn_timeout,
        );

        let worker = SessionWorker::new(self.config, command_rx, snapshot_tx, event_bus);
        let worker_handle = tokio::spawn(worker.run());

        Ok(Runtime {
            handle,
            worker_handle,
        })
    }
}
