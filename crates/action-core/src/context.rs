//! Per-invocation parameter bundle handed to every lifecycle call.
use std::fmt;

use strum::{Display, EnumIter};

use crate::Actor;

/// Opaque handle to a scene object (target, interaction point, interactable).
///
/// The core never dereferences these; concrete actions map them back to
/// whatever their host engine uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj:{}", self.0)
    }
}

/// World-space position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance between two positions.
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Coarse size class of the thing being acted on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SizeCategory {
    Small,
    #[default]
    Medium,
    Large,
    Huge,
}

/// Everything a lifecycle call may need to know about one invocation.
///
/// Built fresh by the caller for every request and held by the executor
/// only while the accepted run is active.
#[derive(Clone, Debug)]
pub struct ActionContext {
    /// The actor performing the action.
    pub actor: Actor,
    pub target: Option<ObjectId>,
    pub target_position: Position,
    pub interaction_point: Option<ObjectId>,
    pub interactable: Option<ObjectId>,
    pub distance: f32,
    pub size: SizeCategory,
}

impl ActionContext {
    /// Creates a context that only names the actor.
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            target: None,
            target_position: Position::ORIGIN,
            interaction_point: None,
            interactable: None,
            distance: 0.0,
            size: SizeCategory::default(),
        }
    }

    /// Actor-only context, as passed to cancellation hooks.
    pub fn for_actor(actor: &Actor) -> Self {
        Self::new(actor.clone())
    }

    pub fn with_target(mut self, target: ObjectId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_target_position(mut self, position: Position) -> Self {
        self.target_position = position;
        self
    }

    pub fn with_interaction_point(mut self, point: ObjectId) -> Self {
        self.interaction_point = Some(point);
        self
    }

    pub fn with_interactable(mut self, interactable: ObjectId) -> Self {
        self.interactable = Some(interactable);
        self
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_size(mut self, size: SizeCategory) -> Self {
        self.size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_optional_fields() {
        let ctx = ActionContext::new(Actor::new(1, "hero"))
            .with_target(ObjectId(9))
            .with_target_position(Position::new(3.0, 0.0, 4.0))
            .with_interactable(ObjectId(2))
            .with_distance(5.0)
            .with_size(SizeCategory::Large);

        assert_eq!(ctx.target, Some(ObjectId(9)));
        assert_eq!(ctx.interactable, Some(ObjectId(2)));
        assert_eq!(ctx.interaction_point, None);
        assert_eq!(ctx.size, SizeCategory::Large);
        assert_eq!(ctx.target_position.distance_to(&Position::ORIGIN), 5.0);
    }

    #[test]
    fn actor_only_context_has_defaults() {
        let actor = Actor::new(3, "npc");
        let ctx = ActionContext::for_actor(&actor);

        assert!(ctx.actor.same_actor(&actor));
        assert_eq!(ctx.target, None);
        assert_eq!(ctx.size, SizeCategory::Medium);
        assert_eq!(ctx.distance, 0.0);
    }
}
