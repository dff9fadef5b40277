//! Sample actions for the demo actor.

use action_core::{ActionRegistry, ActionUnit, Priority, ScriptedAction};

/// Maximum distance, in world units, at which `Magic` can be cast.
pub const MAGIC_RANGE: f32 = 10.0;

/// Builds the demo registry.
///
/// | Action | Priority | Cancellable | Ticks |
/// |--------|----------|-------------|-------|
/// | Sit    | Low      | yes         | 6     |
/// | Talk   | Normal   | no          | 4     |
/// | Attack | High     | yes         | 3     |
/// | Magic  | Critical | yes         | 5     |
pub fn registry() -> ActionRegistry {
    let sit = ScriptedAction::builder("Sit")
        .priority(Priority::Low)
        .duration(6)
        .build();

    let talk = ScriptedAction::builder("Talk")
        .cancellable(false)
        .duration(4)
        .build();

    let attack = ScriptedAction::builder("Attack")
        .priority(Priority::High)
        .duration(3)
        .build();

    let magic = ScriptedAction::builder("Magic")
        .priority(Priority::Critical)
        .duration(5)
        .ready_when(|ctx| ctx.distance <= MAGIC_RANGE)
        .build();

    [sit, talk, attack, magic]
        .into_iter()
        .map(ActionUnit::shared)
        .collect()
}
