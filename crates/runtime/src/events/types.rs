use serde::{Deserialize, Serialize};

use action_core::{ActorId, Rejection};

/// A request the executor turned down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionEvent {
    pub actor: ActorId,
    /// Name the caller asked for.
    pub action: String,
    /// Human-readable reason, as rendered by [`Rejection`]'s `Display`.
    pub reason: String,
}

impl RejectionEvent {
    pub fn new(actor: ActorId, action: impl Into<String>, rejection: &Rejection) -> Self {
        Self {
            actor,
            action: action.into(),
            reason: rejection.to_string(),
        }
    }
}
