//! Cooperative run bodies.
//!
//! This module defines the [`ActionRun`] trait, the resumable body an action
//! hands to the executor, plus a handful of combinators for composing bodies
//! out of smaller pieces: [`WaitTicks`] (delay), [`FromFn`] (closure),
//! [`Sequence`] (one after another) and [`Repeat`] (same body N times).
//!
//! A run is created fresh for every invocation of an action and is never
//! restarted mid-way. Cancelling an action simply drops its run, so any
//! remaining steps are discarded without being executed.

use crate::{ActionContext, Step};

/// A resumable, finite action body.
pub trait ActionRun: Send {
    /// Advance this run by one suspension point.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The context the action was accepted with. It is the same
    ///   value on every resume of a single run.
    ///
    /// # Returns
    ///
    /// - `Step::Yield` to be resumed again on the next tick
    /// - `Step::Done` once the body has finished
    fn resume(&mut self, ctx: &ActionContext) -> Step;
}

/// Blanket implementation for boxed runs.
///
/// This allows `Box<dyn ActionRun>` to be nested inside combinators.
impl ActionRun for Box<dyn ActionRun> {
    #[inline]
    fn resume(&mut self, ctx: &ActionContext) -> Step {
        (**self).resume(ctx)
    }
}

/// Factory used by [`Repeat`] to build each iteration's body.
type RunFactory = Box<dyn FnMut() -> Box<dyn ActionRun> + Send>;

/// Finishes on the `ticks`-th resume.
///
/// A zero-tick wait finishes on its first resume, so every run takes at
/// least one tick.
#[derive(Debug, Clone)]
pub struct WaitTicks {
    ticks: u32,
    elapsed: u32,
}

impl WaitTicks {
    pub fn new(ticks: u32) -> Self {
        Self { ticks, elapsed: 0 }
    }

    /// Number of resumes left before this wait finishes.
    pub fn remaining(&self) -> u32 {
        self.ticks.saturating_sub(self.elapsed)
    }
}

impl ActionRun for WaitTicks {
    fn resume(&mut self, _ctx: &ActionContext) -> Step {
        self.elapsed = self.elapsed.saturating_add(1);
        Step::done_if(self.elapsed >= self.ticks)
    }
}

/// Adapts a closure into a run.
pub struct FromFn<F> {
    f: F,
}

impl<F> FromFn<F>
where
    F: FnMut(&ActionContext) -> Step + Send,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ActionRun for FromFn<F>
where
    F: FnMut(&ActionContext) -> Step + Send,
{
    #[inline]
    fn resume(&mut self, ctx: &ActionContext) -> Step {
        (self.f)(ctx)
    }
}

/// Runs child bodies one after another.
///
/// # Semantics
///
/// - Only the current child is resumed; later children make no progress
/// - When a child returns `Done` and more children remain, the sequence
///   yields so the next child starts on the following tick
/// - The sequence returns `Done` on the tick its last child finishes
///
/// An empty sequence finishes on its first resume.
pub struct Sequence {
    children: Vec<Box<dyn ActionRun>>,
    index: usize,
}

impl Sequence {
    pub fn new(children: Vec<Box<dyn ActionRun>>) -> Self {
        Self { children, index: 0 }
    }
}

impl ActionRun for Sequence {
    fn resume(&mut self, ctx: &ActionContext) -> Step {
        let Some(child) = self.children.get_mut(self.index) else {
            return Step::Done;
        };

        if child.resume(ctx).is_done() {
            self.index += 1;
        }

        Step::done_if(self.index >= self.children.len())
    }
}

/// Runs a freshly built body `times` times in a row.
///
/// Iteration boundaries behave like [`Sequence`] child boundaries. Zero
/// iterations finish on the first resume.
pub struct Repeat {
    factory: RunFactory,
    remaining: u32,
    current: Option<Box<dyn ActionRun>>,
}

impl Repeat {
    pub fn new<F>(times: u32, factory: F) -> Self
    where
        F: FnMut() -> Box<dyn ActionRun> + Send + 'static,
    {
        Self {
            factory: Box::new(factory),
            remaining: times,
            current: None,
        }
    }
}

impl ActionRun for Repeat {
    fn resume(&mut self, ctx: &ActionContext) -> Step {
        if self.remaining == 0 {
            return Step::Done;
        }

        let factory = &mut self.factory;
        let body = self.current.get_or_insert_with(|| factory());

        if body.resume(ctx).is_done() {
            self.current = None;
            self.remaining -= 1;
        }

        Step::done_if(self.remaining == 0)
    }
}

// ============================================================================
// Builder helpers
// ============================================================================

/// Creates a tick delay.
///
/// Shorthand for `Box::new(WaitTicks::new(ticks))`.
#[inline]
pub fn wait(ticks: u32) -> Box<dyn ActionRun> {
    Box::new(WaitTicks::new(ticks))
}

/// Creates a run from a closure.
///
/// Shorthand for `Box::new(FromFn::new(f))`.
#[inline]
pub fn from_fn<F>(f: F) -> Box<dyn ActionRun>
where
    F: FnMut(&ActionContext) -> Step + Send + 'static,
{
    Box::new(FromFn::new(f))
}

/// Creates a single-step run that calls `f` once and finishes.
#[inline]
pub fn once<F>(mut f: F) -> Box<dyn ActionRun>
where
    F: FnMut(&ActionContext) + Send + 'static,
{
    from_fn(move |ctx| {
        f(ctx);
        Step::Done
    })
}

/// Creates a sequence.
///
/// Shorthand for `Box::new(Sequence::new(children))`.
#[inline]
pub fn sequence(children: Vec<Box<dyn ActionRun>>) -> Box<dyn ActionRun> {
    Box::new(Sequence::new(children))
}

/// Creates a repeat.
///
/// Shorthand for `Box::new(Repeat::new(times, factory))`.
#[inline]
pub fn repeat<F>(times: u32, factory: F) -> Box<dyn ActionRun>
where
    F: FnMut() -> Box<dyn ActionRun> + Send + 'static,
{
    Box::new(Repeat::new(times, factory))
}
