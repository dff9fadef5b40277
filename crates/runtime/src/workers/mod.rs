//! Worker tasks that back the runtime orchestration.
//!
//! Each actor gets one worker task that owns its executor; nothing else
//! touches the executor directly.

mod actor;

pub use actor::{ActorWorker, Command};
