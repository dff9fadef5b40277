//! Step returned by cooperative action runs.

/// The result of advancing an action run by one tick.
///
/// # Cooperative Semantics
///
/// An action body is a finite sequence of suspension points:
/// - `Yield` hands control back to the scheduler until the next tick
/// - `Done` ends the body; the executor then finishes the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// The run made progress and wants to be resumed on the next tick.
    Yield,

    /// The run has no remaining steps.
    ///
    /// Resuming a run after it returned `Done` is a caller error; runs are
    /// free to return `Done` again or to restart their own counters.
    Done,
}

impl Step {
    /// Returns `true` if this step is `Yield`.
    #[inline]
    pub fn is_yield(self) -> bool {
        matches!(self, Step::Yield)
    }

    /// Returns `true` if this step is `Done`.
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, Step::Done)
    }

    /// Maps a "finished" flag onto a step.
    #[inline]
    pub fn done_if(finished: bool) -> Self {
        if finished { Step::Done } else { Step::Yield }
    }
}
