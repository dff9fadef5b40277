//! High-level actor runtime.
//!
//! The runtime owns the background worker for one actor, wires up the
//! command/event channels, and exposes a builder-based API for clients.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

use action_core::{ActionExecutor, ActionRegistry, Actor, UnitRef};

use crate::api::{ActorHandle, Result, RuntimeError};
use crate::config::WorkerConfig;
use crate::events::{Event, EventBus, Topic};
use crate::workers::{ActorWorker, Command};

/// Runtime that drives one actor's executor on a background task.
///
/// [`ActorHandle`] provides a cloneable façade for clients.
pub struct ActorRuntime {
    handle: ActorHandle,
    worker_handle: JoinHandle<()>,
}

impl ActorRuntime {
    /// Create a new runtime builder for `actor`
    pub fn builder(actor: Actor) -> ActorRuntimeBuilder {
        ActorRuntimeBuilder::new(actor)
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> ActorHandle {
        self.handle.clone()
    }

    /// Subscribe to events from a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Any running action is cancelled (and its notification published)
    /// before the worker stops. Outstanding handle clones start failing with
    /// [`RuntimeError::CommandChannelClosed`].
    pub async fn shutdown(self) -> Result<()> {
        match self.handle.shutdown().await {
            Ok(()) => {}
            // Worker already gone; joining reports why.
            Err(RuntimeError::CommandChannelClosed | RuntimeError::ReplyChannelClosed(_)) => {
                debug!("Actor worker stopped before shutdown was requested");
            }
            Err(err) => return Err(err),
        }

        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`ActorRuntime`].
pub struct ActorRuntimeBuilder {
    actor: Actor,
    config: WorkerConfig,
    registry: ActionRegistry,
}

impl ActorRuntimeBuilder {
    fn new(actor: Actor) -> Self {
        Self {
            actor,
            config: WorkerConfig::default(),
            registry: ActionRegistry::new(),
        }
    }

    /// Override worker configuration
    pub fn config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from an existing registry, replacing anything registered so far.
    pub fn registry(mut self, registry: ActionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register a unit before the worker starts.
    pub fn register(mut self, unit: UnitRef) -> Self {
        self.registry.register(unit);
        self
    }

    /// Build the runtime and spawn its worker.
    ///
    /// Buffer sizes and the tick interval are raised to their minimums, so a
    /// hand-built [`WorkerConfig`] with zeroed fields still yields a working
    /// worker. Must be called from within a tokio runtime.
    pub fn build(self) -> ActorRuntime {
        let tick_interval = self.config.tick_interval.max(WorkerConfig::MIN_TICK_INTERVAL);
        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = ActorHandle::new(self.actor.clone(), command_tx, event_bus.clone());

        let executor = ActionExecutor::new(self.actor, self.registry);
        let worker = ActorWorker::new(executor, command_rx, event_bus, tick_interval);

        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        ActorRuntime {
            handle,
            worker_handle,
        }
    }
}
