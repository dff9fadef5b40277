//! Action arbitration core for game actors.
//!
//! This crate decides which named action an actor is allowed to perform,
//! drives the winning action through its start/run/end lifecycle, and keeps
//! the actor's coarse activity flag in lockstep with what is executing.
//!
//! - **At most one action per actor**: a request either preempts the incumbent
//!   or is rejected; nothing ever runs side by side
//! - **Ties favor the incumbent**: a request must strictly outrank the running
//!   action, which also makes an action unable to restart itself
//! - **Cooperative runs**: an action's body is a resumable sequence advanced
//!   one [`Step`] per tick; cancellation drops the remaining steps
//! - **No async runtime**: the executor is a plain state machine, the caller
//!   owns the tick loop
//!
//! # Architecture
//!
//! - [`Action`]: Pluggable behavior contract implemented by concrete actions
//! - [`ActionUnit`]: Registered instance that owns the lifecycle [`ActionState`]
//! - [`ActionContext`]: Per-invocation parameter bundle
//! - [`ActionRegistry`]: Name-keyed store of units
//! - [`ActionExecutor`]: Arbiter that owns the single active run
//! - [`Observers`]: Started/completed/cancelled notification listeners
//! - [`run`]: Cooperative run combinators ([`WaitTicks`], [`Sequence`], ...)

pub mod action;
pub mod actor;
pub mod context;
pub mod error;
pub mod events;
pub mod executor;
pub mod registry;
pub mod run;
pub mod scripted;
pub mod step;
pub mod sync;

pub use action::{Action, ActionState, ActionUnit, Priority, UnitRef};
pub use actor::{Activity, Actor, ActorId};
pub use context::{ActionContext, ObjectId, Position, SizeCategory};
pub use error::{Rejection, TransitionError};
pub use events::{ActionEvent, ActionEventKind, ActionObserver, ObserverId, Observers};
pub use executor::{ActionExecutor, ActionSelector, TickOutcome};
pub use registry::ActionRegistry;
pub use run::{ActionRun, FromFn, Repeat, Sequence, WaitTicks};
pub use scripted::{LifecycleCounts, LifecycleProbe, ScriptedAction, ScriptedActionBuilder};
pub use step::Step;
