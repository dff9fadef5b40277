//! Arbitration and lifecycle errors.
//!
//! None of these are fatal. Rejections are the expected outcome of most
//! requests and are cheap to construct; transition errors only surface when
//! a unit is driven outside the executor's lifecycle.

use crate::{ActionState, ActorId, Priority};

/// Why a request was not accepted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// No unit is registered under the requested name.
    #[error("no action registered as `{name}`")]
    UnknownAction { name: String },

    /// The context names a different actor than the one the executor serves.
    #[error("context actor {provided} does not match executor actor {expected}")]
    ActorMismatch { expected: ActorId, provided: ActorId },

    /// The request does not strictly outrank the running action.
    ///
    /// Ties go to the incumbent, which also covers re-requesting the running
    /// action itself.
    #[error(
        "`{requested}` ({requested_priority}) does not outrank running `{current}` ({current_priority})"
    )]
    Outranked {
        requested: String,
        requested_priority: Priority,
        current: String,
        current_priority: Priority,
    },

    /// The running action cannot be interrupted.
    #[error("running `{current}` cannot be cancelled")]
    NotCancellable { current: String },

    /// The requested action's readiness check failed.
    ///
    /// Any incumbent cancelled to make room stays cancelled.
    #[error("`{name}` is not ready to execute")]
    NotReady { name: String },

    /// The unit instance is already claimed by another executor.
    #[error("`{name}` is already being driven elsewhere")]
    Busy { name: String },
}

/// A unit was asked to move between states outside its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("illegal action state transition {from} -> {to}")]
pub struct TransitionError {
    pub from: ActionState,
    pub to: ActionState,
}
