//! Public API surface for actor runtime consumers.
//!
//! Re-exports the handle and error types so clients can depend on a single
//! module.
mod errors;
mod handle;

pub use errors::{Rejection, Result, RuntimeError};
pub use handle::{ActorHandle, ActorStatus};
