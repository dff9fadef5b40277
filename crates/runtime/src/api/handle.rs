//! Cloneable façade for issuing commands to an actor worker.
//!
//! [`ActorHandle`] hides channel plumbing and offers async helpers for
//! requesting and cancelling actions or streaming events from specific
//! topics.
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use action_core::{ActionContext, Activity, Actor, ActorId, UnitRef};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Point-in-time view of an actor's executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorStatus {
    pub actor: ActorId,
    pub activity: Activity,
    /// Name of the current action, if any.
    pub current: Option<String>,
    pub executing: bool,
    pub registered: Vec<String>,
}

/// Client-facing handle to interact with an actor worker
#[derive(Clone)]
pub struct ActorHandle {
    actor: Actor,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl ActorHandle {
    pub(crate) fn new(
        actor: Actor,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            actor,
            command_tx,
            event_bus,
        }
    }

    /// The actor this handle drives.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Starts a context for this actor; fill in the rest with the builder
    /// methods on [`ActionContext`].
    pub fn context(&self) -> ActionContext {
        ActionContext::new(self.actor.clone())
    }

    /// Request an action by name.
    ///
    /// Returns `Err(RuntimeError::Rejected(..))` if arbitration turned it down.
    pub async fn execute(&self, action: impl Into<String>, context: ActionContext) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.send(Command::Execute {
            action: action.into(),
            context,
            reply: reply_tx,
        })
        .await?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)??;
        Ok(())
    }

    /// Request an action by name, reporting only whether it was accepted.
    ///
    /// Channel failures are still returned as errors.
    pub async fn try_execute(
        &self,
        action: impl Into<String>,
        context: ActionContext,
    ) -> Result<bool> {
        match self.execute(action, context).await {
            Ok(()) => Ok(true),
            Err(RuntimeError::Rejected(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Cancel the running action. Returns `false` if nothing was running.
    pub async fn cancel(&self) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Cancel { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Register (or replace) a unit in the worker's registry.
    ///
    /// Returns `true` if an existing unit was replaced.
    pub async fn register(&self, unit: UnitRef) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Register {
            unit,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Query the executor's current status
    pub async fn status(&self) -> Result<ActorStatus> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Status { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Lifecycle` - Started, completed and cancelled actions
    /// - `Topic::Arbitration` - Rejected requests
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use action_runtime::Topic;
    ///
    /// let mut lifecycle = handle.subscribe(Topic::Lifecycle);
    /// while let Ok(event) = lifecycle.recv().await {
    ///     // Switch camera mode, play animation, ...
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) async fn shutdown(&self) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Shutdown { reply: reply_tx }).await?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }
}
