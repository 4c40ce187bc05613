//! Worker tasks that back the runtime orchestration.
//!
//! The session worker owns the live game and executes every command in
//! arrival order.

mod session;

pub use session::{Command, SessionWorker};
