//! Actor identity and coarse activity flag.
//!
//! The arbitration core treats an actor as opaque data: an identity for
//! logging and a single shared [`Activity`] flag. The handle is cheap to clone
//! so every [`crate::ActionContext`] can carry it.
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use strum::{Display, EnumIter, FromRepr};

/// Unique identifier for an actor driven by an executor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl From<u32> for ActorId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Coarse-grained activity of an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, FromRepr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Activity {
    /// Free to accept a new action.
    #[default]
    Idle = 0,
    /// Performing an action.
    Interacting = 1,
}

impl Activity {
    fn from_raw(raw: u8) -> Self {
        // Only `Activity` discriminants are ever stored.
        Self::from_repr(raw).unwrap_or_default()
    }
}

struct ActorInner {
    id: ActorId,
    name: String,
    activity: AtomicU8,
}

/// Shared handle to an actor.
///
/// Clones refer to the same actor; the activity flag is visible through all
/// of them.
#[derive(Clone)]
pub struct Actor {
    inner: Arc<ActorInner>,
}

impl Actor {
    /// Creates an idle actor.
    pub fn new(id: impl Into<ActorId>, name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ActorInner {
                id: id.into(),
                name: name.into(),
                activity: AtomicU8::new(Activity::Idle as u8),
            }),
        }
    }

    pub fn id(&self) -> ActorId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn activity(&self) -> Activity {
        Activity::from_raw(self.inner.activity.load(Ordering::Acquire))
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.activity() == Activity::Idle
    }

    /// Overwrites the activity flag unconditionally.
    ///
    /// Systems other than the executor (cutscenes, stuns) may use this; the
    /// executor's natural-completion path will not clobber their value.
    pub fn set_activity(&self, activity: Activity) {
        self.inner.activity.store(activity as u8, Ordering::Release);
    }

    /// Sets the flag to `new` only if it currently reads `expected`.
    ///
    /// Returns `true` if the flag was changed.
    pub fn compare_and_set_activity(&self, expected: Activity, new: Activity) -> bool {
        self.inner
            .activity
            .compare_exchange(
                expected as u8,
                new as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Returns `true` if both handles refer to the same actor.
    pub fn same_actor(&self, other: &Actor) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("activity", &self.activity())
            .finish()
    }
}
