//! Name-keyed store of action units.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{Action, ActionUnit, UnitRef};

/// Registry of the actions an actor knows how to perform.
///
/// Names are unique; registering a unit under an existing name replaces the
/// previous one (last write wins). Lookups never fail, they return `None`.
/// The registry owns the units and hands out shared references, so an
/// executor can hold one for the duration of a run.
#[derive(Default)]
pub struct ActionRegistry {
    units: HashMap<String, UnitRef>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `unit` under its name.
    ///
    /// Returns the unit that was previously registered under that name, if
    /// any.
    pub fn register(&mut self, unit: UnitRef) -> Option<UnitRef> {
        let name = unit.name().to_owned();
        let previous = self.units.insert(name, unit);

        match &previous {
            Some(old) => warn!(
                action = old.name(),
                "Action re-registered, replacing previous unit"
            ),
            None => debug!(
                total = self.units.len(),
                "Action registered"
            ),
        }

        previous
    }

    /// Wraps `action` in a unit, registers it and returns the new unit.
    pub fn register_action(&mut self, action: impl Action + 'static) -> UnitRef {
        let unit = ActionUnit::shared(action);
        self.register(Arc::clone(&unit));
        unit
    }

    /// Looks a unit up by name.
    pub fn get(&self, name: &str) -> Option<UnitRef> {
        self.units.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.units.contains_key(name)
    }

    /// Returns the names of every registered unit (order unspecified).
    pub fn all_names(&self) -> Vec<String> {
        self.units.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitRef> + '_ {
        self.units.values()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Extend<UnitRef> for ActionRegistry {
    fn extend<I: IntoIterator<Item = UnitRef>>(&mut self, iter: I) {
        for unit in iter {
            self.register(unit);
        }
    }
}

impl FromIterator<UnitRef> for ActionRegistry {
    fn from_iter<I: IntoIterator<Item = UnitRef>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.units.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Priority, ScriptedAction};

    #[test]
    fn lookup_is_total() {
        let registry = ActionRegistry::new();
        assert!(registry.get("Missing").is_none());
        assert!(!registry.contains("Missing"));
        assert!(registry.is_empty());
    }

    #[test]
    fn last_write_wins() {
        let mut registry = ActionRegistry::new();

        let first = registry.register_action(ScriptedAction::builder("Attack").build());
        let second = ActionUnit::shared(
            ScriptedAction::builder("Attack")
                .priority(Priority::High)
                .build(),
        );

        let displaced = registry.register(Arc::clone(&second)).unwrap();
        assert!(Arc::ptr_eq(&displaced, &first));
        assert_eq!(registry.len(), 1);

        let current = registry.get("Attack").unwrap();
        assert!(Arc::ptr_eq(&current, &second));
        assert_eq!(current.priority(), Priority::High);
    }

    #[test]
    fn enumerates_all_names() {
        let registry: ActionRegistry = ["Sit", "Talk", "Attack"]
            .into_iter()
            .map(|name| ActionUnit::shared(ScriptedAction::builder(name).build()))
            .collect();

        let mut names = registry.all_names();
        names.sort();
        assert_eq!(names, vec!["Attack", "Sit", "Talk"]);
        assert_eq!(registry.iter().count(), 3);
    }
}
