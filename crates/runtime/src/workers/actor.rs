//! Actor worker that owns one [`ActionExecutor`].
//!
//! Receives commands from [`ActorHandle`](crate::ActorHandle), ticks the
//! executor on a fixed interval, and publishes events to the EventBus.
//! Commands and ticks are handled one at a time on the same task, so a
//! request is never arbitrated while a step is in progress.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use action_core::{ActionContext, ActionEvent, ActionExecutor, Rejection, TickOutcome, UnitRef};

use crate::api::ActorStatus;
use crate::events::{Event, EventBus, RejectionEvent};

/// Commands that can be sent to the actor worker
pub enum Command {
    /// Arbitrate a request for the named action.
    Execute {
        action: String,
        context: ActionContext,
        reply: oneshot::Sender<Result<(), Rejection>>,
    },
    /// Cancel the running action, if any.
    Cancel { reply: oneshot::Sender<bool> },
    /// Register or replace a unit.
    Register {
        unit: UnitRef,
        reply: oneshot::Sender<bool>,
    },
    /// Query executor status (read-only).
    Status { reply: oneshot::Sender<ActorStatus> },
    /// Cancel whatever is running and stop the worker.
    Shutdown { reply: oneshot::Sender<()> },
}

/// Background task that drives one actor's executor.
pub struct ActorWorker {
    executor: ActionExecutor,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    tick_interval: Duration,
}

impl ActorWorker {
    /// Creates a new actor worker.
    ///
    /// Executor notifications are forwarded to `event_bus` from here on.
    pub fn new(
        mut executor: ActionExecutor,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        tick_interval: Duration,
    ) -> Self {
        let forward = event_bus.clone();
        executor
            .observers_mut()
            .subscribe(move |event: &ActionEvent| forward.publish(Event::Lifecycle(event.clone())));

        info!(
            actor = %executor.actor().id(),
            name = executor.actor().name(),
            actions = executor.registry().len(),
            ?tick_interval,
            "ActorWorker initialized"
        );

        Self {
            executor,
            command_rx,
            event_bus,
            tick_interval,
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        let mut ticker = time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => {
                        if !self.handle_command(cmd) {
                            break;
                        }
                    }
                    None => break,
                },
                _ = ticker.tick() => self.handle_tick(),
            }
        }

        debug!(actor = %self.executor.actor().id(), "ActorWorker stopped");
    }

    /// Handles one command. Returns `false` once the worker should stop.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Execute {
                action,
                context,
                reply,
            } => {
                let result = self.executor.request(action.as_str(), context);
                if let Err(rejection) = &result {
                    self.event_bus.publish(Event::Rejected(RejectionEvent::new(
                        self.executor.actor().id(),
                        action,
                        rejection,
                    )));
                }
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
            }
            Command::Cancel { reply } => {
                let cancelled = self.executor.cancel_current();
                if reply.send(cancelled).is_err() {
                    debug!("Cancel reply channel closed (caller dropped)");
                }
            }
            Command::Register { unit, reply } => {
                let replaced = self.executor.registry_mut().register(unit).is_some();
                if reply.send(replaced).is_err() {
                    debug!("Register reply channel closed (caller dropped)");
                }
            }
            Command::Status { reply } => {
                if reply.send(self.status()).is_err() {
                    debug!("Status reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown { reply } => {
                self.executor.cancel_current();
                if reply.send(()).is_err() {
                    debug!("Shutdown reply channel closed (caller dropped)");
                }
                return false;
            }
        }
        true
    }

    fn handle_tick(&mut self) {
        if let TickOutcome::Completed { action, steps } = self.executor.tick() {
            debug!(
                actor = %self.executor.actor().id(),
                action = action.name(),
                steps,
                "Run finished"
            );
        }
    }

    fn status(&self) -> ActorStatus {
        let actor = self.executor.actor();
        let mut registered = self.executor.registry().all_names();
        registered.sort();

        ActorStatus {
            actor: actor.id(),
            activity: actor.activity(),
            current: self
                .executor
                .current_action()
                .map(|unit| unit.name().to_owned()),
            executing: self.executor.is_executing(),
            registered,
        }
    }
}
