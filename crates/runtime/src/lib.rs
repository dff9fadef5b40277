//! Tokio host for the action arbitration core.
//!
//! This crate wraps one [`action_core::ActionExecutor`] per actor in a
//! background worker that advances the active action once per tick, and
//! exposes it to the rest of a game through a cloneable [`ActorHandle`].
//! Lifecycle notifications are republished on a topic-based [`EventBus`] so
//! camera, UI and animation layers can react without touching the executor.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`config`] holds worker tunables and their environment overrides
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{ActorHandle, ActorStatus, Result, RuntimeError};
pub use config::WorkerConfig;
pub use events::{Event, EventBus, RejectionEvent, Topic};
pub use runtime::{ActorRuntime, ActorRuntimeBuilder};
