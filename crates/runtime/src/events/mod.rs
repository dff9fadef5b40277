//! Topic-based event bus for actor runtime events.
//!
//! The worker forwards every executor notification to [`Topic::Lifecycle`]
//! and every rejected request to [`Topic::Arbitration`]; consumers subscribe
//! only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::RejectionEvent;
