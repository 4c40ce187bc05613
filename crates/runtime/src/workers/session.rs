//! Session worker that owns the authoritative [`game_core::GameState`].
//!
//! Receives commands from [`crate::SessionHandle`], runs turns through
//! [`game_core::GameEngine`] on a working copy, and commits the copy only
//! when the turn completes. Every commit publishes a fresh snapshot.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use game_content::DungeonGenerator;
use game_core::{
    ActionToken, GameConfig, GameEngine, GameError, Snapshot, TurnError, legal_actions,
};

use crate::api::{Result, RuntimeError, StartRequest};
use crate::events::{EventBus, SessionEvent, TurnEvent};
use crate::runtime::RuntimeConfig;
use crate::session::ActiveSession;

/// Commands that can be sent to the session worker
pub enum Command {
    /// Build a new session and swap it in if it is valid.
    Start {
        request: StartRequest,
        reply: oneshot::Sender<Result<Arc<Snapshot>>>,
    },
    /// Run one turn (or one menu-navigation step).
    Submit {
        token: ActionToken,
        reply: oneshot::Sender<Result<Arc<Snapshot>>>,
    },
    LegalActions {
        reply: oneshot::Sender<Vec<ActionToken>>,
    },
}

/// Background task that processes session commands.
pub struct SessionWorker {
    config: RuntimeConfig,
    generator: DungeonGenerator,
    session: Option<ActiveSession>,
    command_rx: mpsc::Receiver<Command>,
    snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,
    event_bus: EventBus,
}

impl SessionWorker {
    pub fn new(
        config: RuntimeConfig,
        command_rx: mpsc::Receiver<Command>,
        snapshot_tx: watch::Sender<Option<Arc<Snapshot>>>,
        event_bus: EventBus,
    ) -> Self {
        let generator = DungeonGenerator::new(config.generation.clone());
        Self {
            config,
            generator,
            session: None,
            command_rx,
            snapshot_tx,
            event_bus,
        }
    }

    /// Main worker loop. Ends once every handle has been dropped.
    pub async fn run(mut self) {
        info!(target: "runtime::worker", "session worker started");
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        info!(target: "runtime::worker", "session worker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { request, reply } => {
                let result = self.handle_start(request);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Start reply channel closed (caller dropped)");
                }
            }
            Command::Submit { token, reply } => {
                let result = self.handle_submit(token);
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Submit reply channel closed (caller dropped)");
                }
            }
            Command::LegalActions { reply } => {
                let actions = self.current_legal_actions();
                if reply.send(actions).is_err() {
                    debug!(target: "runtime::worker", "LegalActions reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_start(&mut self, request: StartRequest) -> Result<Arc<Snapshot>> {
        let session = ActiveSession::start(
            &request,
            &self.config.game,
            &self.config.default_map_path,
            &self.generator,
        )
        .inspect_err(|err| {
            warn!(target: "runtime::session", mode = %request.mode, error = %err, "start request refused");
        })?;

        info!(
            target: "runtime::session",
            mode = %request.mode,
            seed = request.seed,
            width = session.state.map.width(),
            height = session.state.map.height(),
            "session started"
        );

        let snapshot = publish_snapshot(&self.snapshot_tx, &self.config.game, &session);
        self.event_bus.publish(SessionEvent::SessionStarted {
            mode: session.state.mode,
            seed: session.state.game_seed,
            dungeon_level: session.state.turn.dungeon_level,
        });
        self.session = Some(session);
        Ok(snapshot)
    }

    fn handle_submit(&mut self, token: ActionToken) -> Result<Arc<Snapshot>> {
        let Some(session) = self.session.as_mut() else {
            return Err(RuntimeError::NoActiveSession { phase: None });
        };
        let before = session.state.phase;

        let mut working = session.state.clone();
        let outcome = {
            let env = session.env(&self.config.game);
            GameEngine::new(&mut working).submit(&env, token)
        };

        match outcome {
            Ok(outcome) => {
                debug!(
                    target: "runtime::worker",
                    token = %token,
                    nonce = working.turn.nonce,
                    phase = %outcome.phase,
                    "turn committed"
                );
                let event = TurnEvent::TurnCompleted {
                    token,
                    nonce: working.turn.nonce,
                    dungeon_level: working.turn.dungeon_level,
                    turn: working.turn.turn,
                    messages: outcome.messages,
                    level_changed: outcome.level_changed,
                };
                let result = working.outcome;
                session.state = working;

                let snapshot = publish_snapshot(&self.snapshot_tx, &self.config.game, session);
                self.event_bus.publish(event);
                if outcome.phase != before {
                    info!(target: "runtime::session", from = %before, to = %outcome.phase, outcome = %result, "phase changed");
                    self.event_bus.publish(SessionEvent::PhaseChanged {
                        from: before,
                        to: outcome.phase,
                        outcome: result,
                    });
                }
                Ok(snapshot)
            }
            Err(TurnError::Illegal { token, reason }) => {
                debug!(
                    target: "runtime::worker",
                    token = %token,
                    code = reason.error_code(),
                    reason = %reason,
                    "action rejected"
                );
                self.event_bus.publish(TurnEvent::ActionRejected {
                    token,
                    reason: reason.to_string(),
                    code: reason.error_code().to_string(),
                });
                Err(RuntimeError::IllegalAction { token, reason })
            }
            Err(TurnError::NoActiveSession { phase }) => {
                Err(RuntimeError::NoActiveSession { phase: Some(phase) })
            }
            Err(TurnError::Invariant(err)) => {
                error!(
                    target: "runtime::worker",
                    token = %token,
                    phase = err.phase().map_or("registry", |phase| phase.as_str()),
                    code = err.error_code(),
                    error = %err,
                    "turn aborted; session reverted"
                );
                self.event_bus.publish(TurnEvent::TurnAborted {
                    token,
                    error: err.to_string(),
                    code: err.error_code().to_string(),
                });
                Err(RuntimeError::InvariantViolation(err))
            }
        }
    }

    fn current_legal_actions(&self) -> Vec<ActionToken> {
        match self.session.as_ref() {
            Some(session) => legal_actions(&session.state, &session.env(&self.config.game)),
            None => Vec::new(),
        }
    }
}

/// Captures the committed session and hands it to snapshot readers.
fn publish_snapshot(
    snapshot_tx: &watch::Sender<Option<Arc<Snapshot>>>,
    config: &GameConfig,
    session: &ActiveSession,
) -> Arc<Snapshot> {
    let env = session.env(config);
    let snapshot = Arc::new(Snapshot::capture(&session.state, &env));
    snapshot_tx.send_replace(Some(Arc::clone(&snapshot)));
    snapshot
}
