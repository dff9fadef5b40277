//! Lifecycle notifications.
//!
//! The executor publishes one [`ActionEvent`] when it accepts an action and
//! exactly one more when that run either completes or is cancelled. Camera
//! rigs, UI and animation layers subscribe through [`Observers`] without the
//! executor knowing about them.

use strum::Display;

use crate::ActorId;

/// Which lifecycle boundary an event marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionEventKind {
    /// Published after `on_start`.
    Started,
    /// Published after `on_end`.
    Completed,
    /// Published after `on_cancel`.
    Cancelled,
}

/// A lifecycle notification for one action run.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionEvent {
    pub kind: ActionEventKind,
    /// Name of the affected action.
    pub action: String,
    pub actor: ActorId,
}

impl ActionEvent {
    pub fn new(kind: ActionEventKind, action: impl Into<String>, actor: ActorId) -> Self {
        Self {
            kind,
            action: action.into(),
            actor,
        }
    }

    /// Returns `true` for `Completed` and `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self.kind, ActionEventKind::Started)
    }
}

/// Receives lifecycle notifications.
///
/// Observers run synchronously inside the executor call that produced the
/// event and must not block.
pub trait ActionObserver: Send {
    fn on_event(&mut self, event: &ActionEvent);
}

impl<F> ActionObserver for F
where
    F: FnMut(&ActionEvent) + Send,
{
    #[inline]
    fn on_event(&mut self, event: &ActionEvent) {
        self(event)
    }
}

/// Handle returned by [`Observers::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Ordered list of registered observers.
///
/// Events are delivered in subscription order.
#[derive(Default)]
pub struct Observers {
    entries: Vec<(ObserverId, Box<dyn ActionObserver>)>,
    next_id: u64,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: impl ActionObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn publish(&mut self, event: &ActionEvent) {
        for (_, observer) in self.entries.iter_mut() {
            observer.on_event(event);
        }
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("len", &self.entries.len())
            .finish()
    }
}
