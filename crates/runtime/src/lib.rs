//! Session façade for the dungeon crawler.
//!
//! This crate owns the single live game session and serializes every
//! mutation through one worker task. Consumers embed [`Runtime`] and talk to
//! the session through the cloneable [`SessionHandle`]: start a game, submit
//! action tokens, read snapshots, and subscribe to events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`session`] builds sessions from start requests
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod session;

mod workers;

pub use api::{
    MapSource, Result, RuntimeError, SessionHandle, StartError, StartRequest, TokenInput,
};
pub use events::{Event, EventBus, SessionEvent, Topic, TurnEvent};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
