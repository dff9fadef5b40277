//! Action executor: arbitration, lifecycle driving and cancellation.
//!
//! One [`ActionExecutor`] serves exactly one actor. It holds at most one
//! active run and decides, for every request, whether the requested action
//! may take the actor over:
//!
//! 1. Resolve the request to a unit (unknown names are rejected)
//! 2. If something is running, the request must strictly outrank it and the
//!    incumbent must be cancellable; the incumbent is then cancelled
//! 3. The requested unit's readiness check must pass
//! 4. The unit is claimed, started, and the actor flips to `Interacting`
//!
//! Arbitration is synchronous: nothing can interleave between the priority
//! check and `on_start`. The body of the accepted action is advanced one step
//! per [`ActionExecutor::tick`] by whatever loop owns the executor.

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::Rejection;
use crate::run::ActionRun;
use crate::{
    ActionContext, ActionEvent, ActionEventKind, ActionRegistry, ActionState, Actor, Observers,
    Step, UnitRef, sync,
};

/// Identifies the action a caller wants: by registry name or by reference.
#[derive(Clone, Debug)]
pub enum ActionSelector<'a> {
    Name(&'a str),
    Unit(UnitRef),
}

impl<'a> From<&'a str> for ActionSelector<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl<'a> From<&'a String> for ActionSelector<'a> {
    fn from(name: &'a String) -> Self {
        Self::Name(name)
    }
}

impl From<UnitRef> for ActionSelector<'_> {
    fn from(unit: UnitRef) -> Self {
        Self::Unit(unit)
    }
}

impl From<&UnitRef> for ActionSelector<'_> {
    fn from(unit: &UnitRef) -> Self {
        Self::Unit(Arc::clone(unit))
    }
}

/// What a call to [`ActionExecutor::tick`] did.
#[derive(Clone, Debug)]
pub enum TickOutcome {
    /// Nothing is running.
    Idle,
    /// The active body yielded; `steps` counts resumes so far.
    Running { action: UnitRef, steps: u32 },
    /// The active body finished and the run was completed this tick.
    Completed { action: UnitRef, steps: u32 },
}

impl TickOutcome {
    pub fn is_idle(&self) -> bool {
        matches!(self, TickOutcome::Idle)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, TickOutcome::Completed { .. })
    }
}

/// The single in-flight run: the unit, the context it was accepted with and
/// its resumable body. Holding all three in one record means "current
/// action" and "run handle" can never disagree on presence.
struct ActiveRun {
    unit: UnitRef,
    context: ActionContext,
    body: Box<dyn ActionRun>,
    steps: u32,
}

/// Arbiter and lifecycle driver for one actor.
pub struct ActionExecutor {
    actor: Actor,
    registry: ActionRegistry,
    observers: Observers,
    active: Option<ActiveRun>,
}

impl ActionExecutor {
    /// Creates an idle executor for `actor`.
    pub fn new(actor: Actor, registry: ActionRegistry) -> Self {
        Self {
            actor,
            registry,
            observers: Observers::new(),
            active: None,
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Mutable registry access, for registering actions during play.
    pub fn registry_mut(&mut self) -> &mut ActionRegistry {
        &mut self.registry
    }

    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    /// The action currently holding the actor, if any.
    pub fn current_action(&self) -> Option<UnitRef> {
        self.active.as_ref().map(|active| Arc::clone(&active.unit))
    }

    /// The context the current action was accepted with.
    pub fn current_context(&self) -> Option<&ActionContext> {
        self.active.as_ref().map(|active| &active.context)
    }

    /// `true` if an action is current *and* its unit reads `Executing`.
    pub fn is_executing(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.unit.state() == ActionState::Executing)
    }

    /// Requests an action; returns whether it was accepted.
    ///
    /// See [`ActionExecutor::request`] for the rules.
    pub fn try_execute<'a>(
        &mut self,
        selector: impl Into<ActionSelector<'a>>,
        ctx: ActionContext,
    ) -> bool {
        self.request(selector, ctx).is_ok()
    }

    /// Requests an action and reports why it was rejected.
    ///
    /// # Errors
    ///
    /// - [`Rejection::UnknownAction`]: name not in the registry, no state change
    /// - [`Rejection::ActorMismatch`]: context built for another actor, no state change
    /// - [`Rejection::Outranked`]: priority not strictly higher than the
    ///   incumbent's (including re-requesting the incumbent), no state change
    /// - [`Rejection::NotCancellable`]: incumbent cannot be interrupted, no state change
    /// - [`Rejection::NotReady`]: readiness check failed; an incumbent that was
    ///   cancelled to make room stays cancelled
    /// - [`Rejection::Busy`]: unit claimed by another executor; same caveat
    pub fn request<'a>(
        &mut self,
        selector: impl Into<ActionSelector<'a>>,
        ctx: ActionContext,
    ) -> Result<(), Rejection> {
        let result = self.arbitrate(selector.into(), ctx);

        if let Err(rejection) = &result {
            debug!(
                actor = %self.actor.id(),
                reason = %rejection,
                "Action request rejected"
            );
        }

        result
    }

    /// Cancels the running action, if any.
    ///
    /// The body is dropped at its current suspension point, `on_cancel` runs
    /// with an actor-only context, observers are told, the unit is reset and
    /// the actor is forced back to `Idle`. Returns `false` if nothing was
    /// running.
    pub fn cancel_current(&mut self) -> bool {
        let Some(ActiveRun {
            unit, body, steps, ..
        }) = self.active.take()
        else {
            return false;
        };

        // Remaining steps are discarded, never drained.
        drop(body);

        let ctx = ActionContext::for_actor(&self.actor);
        if let Err(err) = unit.cancel(&ctx) {
            error!(
                action = unit.name(),
                error = %err,
                "Cancelled unit was not executing"
            );
        }
        self.publish(ActionEventKind::Cancelled, &unit);

        unit.reset();
        sync::force_idle(&self.actor);

        debug!(
            actor = %self.actor.id(),
            action = unit.name(),
            steps,
            "Action cancelled"
        );

        true
    }

    /// Advances the active body by one step.
    ///
    /// When the body reports `Done` the run is completed in the same call:
    /// `on_end`, the completed notification, activity restore and reset.
    pub fn tick(&mut self) -> TickOutcome {
        let Some(mut active) = self.active.take() else {
            return TickOutcome::Idle;
        };

        debug_assert_eq!(
            active.unit.state(),
            ActionState::Executing,
            "active unit must be executing"
        );

        active.steps = active.steps.saturating_add(1);
        let steps = active.steps;

        match active.body.resume(&active.context) {
            Step::Yield => {
                let action = Arc::clone(&active.unit);
                self.active = Some(active);
                TickOutcome::Running { action, steps }
            }
            Step::Done => TickOutcome::Completed {
                action: self.complete_active(active),
                steps,
            },
        }
    }

    fn arbitrate(
        &mut self,
        selector: ActionSelector<'_>,
        ctx: ActionContext,
    ) -> Result<(), Rejection> {
        let requested = self.resolve(selector)?;

        if !ctx.actor.same_actor(&self.actor) {
            return Err(Rejection::ActorMismatch {
                expected: self.actor.id(),
                provided: ctx.actor.id(),
            });
        }

        if let Some(active) = &self.active {
            let current = &active.unit;

            // Ties go to the incumbent; this also stops an action from
            // restarting itself.
            if requested.priority() <= current.priority() {
                return Err(Rejection::Outranked {
                    requested: requested.name().to_owned(),
                    requested_priority: requested.priority(),
                    current: current.name().to_owned(),
                    current_priority: current.priority(),
                });
            }

            if !current.cancellable() {
                return Err(Rejection::NotCancellable {
                    current: current.name().to_owned(),
                });
            }

            self.cancel_current();
        }

        if !requested.can_execute(&ctx) {
            return Err(Rejection::NotReady {
                name: requested.name().to_owned(),
            });
        }

        if requested.claim().is_err() {
            return Err(Rejection::Busy {
                name: requested.name().to_owned(),
            });
        }

        self.accept(requested, ctx)
    }

    fn resolve(&self, selector: ActionSelector<'_>) -> Result<UnitRef, Rejection> {
        match selector {
            ActionSelector::Unit(unit) => Ok(unit),
            ActionSelector::Name(name) => {
                self.registry.get(name).ok_or_else(|| Rejection::UnknownAction {
                    name: name.to_owned(),
                })
            }
        }
    }

    /// Starts a claimed unit and installs it as the active run.
    fn accept(&mut self, unit: UnitRef, context: ActionContext) -> Result<(), Rejection> {
        let body = match unit.start(&context) {
            Ok(body) => body,
            Err(err) => {
                // `claim` just succeeded, so only a foreign reset can get here.
                error!(
                    action = unit.name(),
                    error = %err,
                    "Claimed unit left Executing before start"
                );
                return Err(Rejection::Busy {
                    name: unit.name().to_owned(),
                });
            }
        };

        sync::enter_interacting(&self.actor);

        self.active = Some(ActiveRun {
            unit: Arc::clone(&unit),
            context,
            body,
            steps: 0,
        });
        self.publish(ActionEventKind::Started, &unit);

        debug!(
            actor = %self.actor.id(),
            action = unit.name(),
            priority = %unit.priority(),
            "Action started"
        );

        Ok(())
    }

    /// Finishes a run whose body reported `Done`.
    fn complete_active(&mut self, active: ActiveRun) -> UnitRef {
        let ActiveRun { unit, context, .. } = active;

        if let Err(err) = unit.complete(&context) {
            error!(
                action = unit.name(),
                error = %err,
                "Completed unit was not executing"
            );
        }
        self.publish(ActionEventKind::Completed, &unit);

        sync::release_if_interacting(&self.actor);
        unit.reset();

        debug!(
            actor = %self.actor.id(),
            action = unit.name(),
            "Action completed"
        );

        unit
    }

    fn publish(&mut self, kind: ActionEventKind, unit: &UnitRef) {
        let event = ActionEvent::new(kind, unit.name(), self.actor.id());
        self.observers.publish(&event);
    }
}

impl Drop for ActionExecutor {
    /// Releases a claimed unit so a shared registry can reuse it.
    fn drop(&mut self) {
        self.cancel_current();
    }
}

impl std::fmt::Debug for ActionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionExecutor")
            .field("actor", &self.actor)
            .field("current", &self.active.as_ref().map(|a| a.unit.name()))
            .field("registry", &self.registry)
            .field("observers", &self.observers)
            .finish()
    }
}
