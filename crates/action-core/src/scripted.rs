//! Data-driven action with a fixed duration.
//!
//! [`ScriptedAction`] computes no effects of its own. It waits a number of
//! ticks, gates on an optional readiness predicate and records every
//! lifecycle call it receives, which makes it the stand-in for real combat,
//! inventory or dialogue actions in demos and tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::run::{self, ActionRun};
use crate::{Action, ActionContext, Priority};

type ReadyPredicate = Box<dyn Fn(&ActionContext) -> bool + Send + Sync>;

/// Counts of lifecycle calls observed by a [`ScriptedAction`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LifecycleCounts {
    pub started: u32,
    pub steps: u32,
    pub ended: u32,
    pub cancelled: u32,
    pub resets: u32,
}

#[derive(Debug, Default)]
struct Counters {
    started: AtomicU32,
    steps: AtomicU32,
    ended: AtomicU32,
    cancelled: AtomicU32,
    resets: AtomicU32,
}

/// Cloneable view of a scripted action's counters.
///
/// Stays valid after the action has been moved into a registry.
#[derive(Clone, Debug, Default)]
pub struct LifecycleProbe {
    counters: Arc<Counters>,
}

impl LifecycleProbe {
    pub fn counts(&self) -> LifecycleCounts {
        let c = &self.counters;
        LifecycleCounts {
            started: c.started.load(Ordering::Relaxed),
            steps: c.steps.load(Ordering::Relaxed),
            ended: c.ended.load(Ordering::Relaxed),
            cancelled: c.cancelled.load(Ordering::Relaxed),
            resets: c.resets.load(Ordering::Relaxed),
        }
    }
}

/// An action described entirely by data.
pub struct ScriptedAction {
    name: String,
    priority: Priority,
    cancellable: bool,
    duration: u32,
    ready: Option<ReadyPredicate>,
    probe: LifecycleProbe,
}

impl ScriptedAction {
    pub fn builder(name: impl Into<String>) -> ScriptedActionBuilder {
        ScriptedActionBuilder::new(name)
    }

    /// Returns a handle to this action's lifecycle counters.
    pub fn probe(&self) -> LifecycleProbe {
        self.probe.clone()
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }
}

impl Action for ScriptedAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> Priority {
        self.priority
    }

    fn cancellable(&self) -> bool {
        self.cancellable
    }

    fn can_execute(&self, ctx: &ActionContext) -> bool {
        self.ready.as_ref().is_none_or(|ready| ready(ctx))
    }

    fn on_start(&self, _ctx: &ActionContext) {
        self.probe.counters.started.fetch_add(1, Ordering::Relaxed);
    }

    fn run(&self, _ctx: &ActionContext) -> Box<dyn ActionRun> {
        let counters = Arc::clone(&self.probe.counters);
        let mut wait = run::WaitTicks::new(self.duration);

        run::from_fn(move |ctx| {
            counters.steps.fetch_add(1, Ordering::Relaxed);
            wait.resume(ctx)
        })
    }

    fn on_end(&self, _ctx: &ActionContext) {
        self.probe.counters.ended.fetch_add(1, Ordering::Relaxed);
    }

    fn on_cancel(&self, _ctx: &ActionContext) {
        self.probe.counters.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    fn on_reset(&self) {
        self.probe.counters.resets.fetch_add(1, Ordering::Relaxed);
    }
}

/// Builder for [`ScriptedAction`].
pub struct ScriptedActionBuilder {
    name: String,
    priority: Priority,
    cancellable: bool,
    duration: u32,
    ready: Option<ReadyPredicate>,
}

impl ScriptedActionBuilder {
    /// Default duration, in ticks, of a scripted action.
    pub const DEFAULT_DURATION: u32 = 1;

    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority: Priority::default(),
            cancellable: true,
            duration: Self::DEFAULT_DURATION,
            ready: None,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn cancellable(mut self, cancellable: bool) -> Self {
        self.cancellable = cancellable;
        self
    }

    /// Number of ticks the body takes to finish.
    pub fn duration(mut self, ticks: u32) -> Self {
        self.duration = ticks;
        self
    }

    /// Readiness predicate; without one the action is always ready.
    pub fn ready_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ActionContext) -> bool + Send + Sync + 'static,
    {
        self.ready = Some(Box::new(predicate));
        self
    }

    pub fn build(self) -> ScriptedAction {
        ScriptedAction {
            name: self.name,
            priority: self.priority,
            cancellable: self.cancellable,
            duration: self.duration,
            ready: self.ready,
            probe: LifecycleProbe::default(),
        }
    }
}
