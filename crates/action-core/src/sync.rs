//! Keeps the actor's activity flag in lockstep with arbitration.
//!
//! The executor writes the flag at exactly two points: `Interacting` when an
//! action is accepted, `Idle` when it ends or is cancelled. A natural ending
//! only restores `Idle` if the flag still reads `Interacting`, so a value set
//! meanwhile by an unrelated writer survives.

use tracing::trace;

use crate::{Activity, Actor};

/// Marks the actor as busy. Called on acceptance.
pub fn enter_interacting(actor: &Actor) {
    actor.set_activity(Activity::Interacting);
    trace!(actor = %actor.id(), "Activity -> Interacting");
}

/// Restores `Idle` after a natural completion, unless someone else changed
/// the flag while the action ran.
///
/// Returns `true` if the flag was restored.
pub fn release_if_interacting(actor: &Actor) -> bool {
    let released = actor.compare_and_set_activity(Activity::Interacting, Activity::Idle);
    if released {
        trace!(actor = %actor.id(), "Activity -> Idle");
    } else {
        trace!(
            actor = %actor.id(),
            activity = %actor.activity(),
            "Activity changed externally, leaving it"
        );
    }
    released
}

/// Forces `Idle`. Called on cancellation.
pub fn force_idle(actor: &Actor) {
    actor.set_activity(Activity::Idle);
    trace!(actor = %actor.id(), "Activity -> Idle (forced)");
}
