//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration and the worker.

pub mod errors;
pub mod handle;
pub mod request;

pub use errors::{Result, RuntimeError, StartError};
pub use handle::{SessionHandle, TokenInput};
pub use request::{MapSource, StartRequest};
