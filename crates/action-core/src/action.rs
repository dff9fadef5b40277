//! Action contract and the registered unit wrapper.
//!
//! Concrete actions implement [`Action`]; they describe *what* happens. The
//! registry wraps each one in an [`ActionUnit`], which owns the lifecycle
//! [`ActionState`] and enforces the legal transitions:
//!
//! ```text
//! Ready --claim--> Executing --complete--> Completed --reset--> Ready
//!                      |
//!                      +------cancel-----> Cancelled --reset--> Ready
//! ```
//!
//! Units are reused across many invocations, so `reset` always brings the
//! state back to `Ready`.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use strum::{Display, EnumIter, FromRepr};

use crate::ActionContext;
use crate::error::TransitionError;
use crate::run::ActionRun;

/// Shared reference to a registered unit.
pub type UnitRef = Arc<ActionUnit>;

/// Arbitration priority. Ordered `Low < Normal < High < Critical`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Priority {
    Low = 0,
    #[default]
    Normal = 1,
    High = 2,
    Critical = 3,
}

/// Lifecycle state of a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, FromRepr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ActionState {
    #[default]
    Ready = 0,
    Executing = 1,
    Completed = 2,
    Cancelled = 3,
}

/// A named behavior an actor can perform.
///
/// Implementations must be cheap to query: `name`, `priority`, `cancellable`
/// and `can_execute` are evaluated on every request, most of which are
/// rejected. None of the hooks may block; long-running work belongs in the
/// body returned by [`Action::run`].
pub trait Action: Send + Sync {
    /// Stable identifier, unique within a registry.
    fn name(&self) -> &str;

    fn priority(&self) -> Priority {
        Priority::Normal
    }

    /// Whether a higher-priority request may interrupt this action.
    fn cancellable(&self) -> bool {
        true
    }

    /// Readiness predicate for this invocation.
    ///
    /// Must not mutate anything. Only evaluated for the *requested* action;
    /// a running action is never re-checked.
    fn can_execute(&self, _ctx: &ActionContext) -> bool {
        true
    }

    /// Called once when the action is accepted, before the first step.
    fn on_start(&self, _ctx: &ActionContext) {}

    /// Builds a fresh body for this invocation.
    fn run(&self, ctx: &ActionContext) -> Box<dyn ActionRun>;

    /// Called once after the body finishes on its own.
    fn on_end(&self, _ctx: &ActionContext) {}

    /// Called instead of `on_end` when the action is interrupted.
    ///
    /// Receives an actor-only context and may be called before the body has
    /// made any progress.
    fn on_cancel(&self, _ctx: &ActionContext) {}

    /// Clears any per-invocation state the action keeps internally.
    fn on_reset(&self) {}
}

/// A registered action plus its lifecycle state.
pub struct ActionUnit {
    name: String,
    behavior: Box<dyn Action>,
    state: AtomicU8,
}

impl ActionUnit {
    pub fn new(behavior: impl Action + 'static) -> Self {
        Self {
            name: behavior.name().to_owned(),
            behavior: Box::new(behavior),
            state: AtomicU8::new(ActionState::Ready as u8),
        }
    }

    /// Wraps `behavior` and returns a shareable reference.
    pub fn shared(behavior: impl Action + 'static) -> UnitRef {
        Arc::new(Self::new(behavior))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> Priority {
        self.behavior.priority()
    }

    pub fn cancellable(&self) -> bool {
        self.behavior.cancellable()
    }

    pub fn state(&self) -> ActionState {
        // Only `ActionState` discriminants are ever stored.
        ActionState::from_repr(self.state.load(Ordering::Acquire)).unwrap_or_default()
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state() == ActionState::Ready
    }

    pub fn can_execute(&self, ctx: &ActionContext) -> bool {
        self.behavior.can_execute(ctx)
    }

    /// The wrapped behavior.
    pub fn behavior(&self) -> &dyn Action {
        self.behavior.as_ref()
    }

    /// Claims the unit for one run (`Ready -> Executing`).
    ///
    /// Fails if another executor is already driving this instance.
    pub(crate) fn claim(&self) -> Result<(), TransitionError> {
        self.transition(ActionState::Ready, ActionState::Executing)
    }

    /// Runs `on_start` and builds the body for a claimed unit.
    pub(crate) fn start(&self, ctx: &ActionContext) -> Result<Box<dyn ActionRun>, TransitionError> {
        self.expect_state(ActionState::Executing, ActionState::Executing)?;
        self.behavior.on_start(ctx);
        Ok(self.behavior.run(ctx))
    }

    /// Runs `on_end` and moves `Executing -> Completed`.
    pub(crate) fn complete(&self, ctx: &ActionContext) -> Result<(), TransitionError> {
        self.expect_state(ActionState::Executing, ActionState::Completed)?;
        self.behavior.on_end(ctx);
        self.transition(ActionState::Executing, ActionState::Completed)
    }

    /// Runs `on_cancel` and moves `Executing -> Cancelled`.
    pub(crate) fn cancel(&self, ctx: &ActionContext) -> Result<(), TransitionError> {
        self.expect_state(ActionState::Executing, ActionState::Cancelled)?;
        self.behavior.on_cancel(ctx);
        self.transition(ActionState::Executing, ActionState::Cancelled)
    }

    /// Returns the unit to `Ready` unconditionally.
    pub(crate) fn reset(&self) {
        self.behavior.on_reset();
        self.state.store(ActionState::Ready as u8, Ordering::Release);
    }

    fn expect_state(&self, expected: ActionState, to: ActionState) -> Result<(), TransitionError> {
        let from = self.state();
        if from == expected {
            Ok(())
        } else {
            Err(TransitionError { from, to })
        }
    }

    fn transition(&self, from: ActionState, to: ActionState) -> Result<(), TransitionError> {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|actual| TransitionError {
                from: ActionState::from_repr(actual).unwrap_or_default(),
                to,
            })
    }
}

impl fmt::Debug for ActionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionUnit")
            .field("name", &self.name)
            .field("priority", &self.priority())
            .field("cancellable", &self.cancellable())
            .field("state", &self.state())
            .finish()
    }
}
