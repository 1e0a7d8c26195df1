//! Ordered storage for registered systems.
//!
//! The [`Registry`] assigns each system an [`Id`] in registration order and keeps the systems
//! sorted by `(order, registration sequence)`, which is the order the scheduler runs them in.

use crate::ecs::system::{Id, System};

/// A registered system and its ordering key.
pub struct Entry {
    id: Id,
    order: i32,
    system: Box<dyn System>,
}

impl Entry {
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    #[inline]
    pub fn order(&self) -> i32 {
        self.order
    }

    #[inline]
    pub fn system(&mut self) -> &mut dyn System {
        self.system.as_mut()
    }
}

/// A registry of systems kept in run order.
///
/// # Examples
///
/// ```rust,ignore
/// let mut registry = Registry::new();
///
/// let late = registry.register(Box::new(render), 10);
/// let early = registry.register(Box::new(physics), -5);
///
/// let order: Vec<_> = registry.iter_mut().map(|entry| entry.id()).collect();
/// assert_eq!(order, vec![early, late]);
/// ```
#[derive(Default)]
pub struct Registry {
    /// Sorted by `(order, id)`. Ids grow with registration, so ties keep registration order.
    entries: Vec<Entry>,
}

impl Registry {
    /// Create a new, empty system registry.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a system and return its identifier.
    pub fn register(&mut self, system: Box<dyn System>, order: i32) -> Id {
        let id = Id::new(self.entries.len() as u32);

        // Insert after every entry with an order <= this one.
        let at = self.entries.partition_point(|entry| entry.order <= order);
        self.entries.insert(at, Entry { id, order, system });

        id
    }

    /// Entries in run order.
    #[inline]
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entry> {
        self.entries.iter_mut()
    }

    /// Entry at `position` in run order.
    #[inline]
    pub fn get_mut(&mut self, position: usize) -> Option<&mut Entry> {
        self.entries.get_mut(position)
    }

    /// Number of registered systems.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{entity::Entity, system::Failure, world::World};

    fn noop() -> Box<dyn System> {
        Box::new(|_: &mut World, _: Entity, _: f32| -> Result<(), Failure> { Ok(()) })
    }

    fn run_order(registry: &mut Registry) -> Vec<Id> {
        registry.iter_mut().map(|entry| entry.id()).collect()
    }

    #[test]
    fn ids_follow_registration() {
        // Given
        let mut registry = Registry::new();

        // When
        let a = registry.register(noop(), 0);
        let b = registry.register(noop(), 0);

        // Then
        assert_eq!(a, Id::new(0));
        assert_eq!(b, Id::new(1));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn lower_order_runs_first() {
        // Given
        let mut registry = Registry::new();

        // When
        let late = registry.register(noop(), 10);
        let early = registry.register(noop(), -5);
        let middle = registry.register(noop(), 0);

        // Then
        assert_eq!(run_order(&mut registry), vec![early, middle, late]);
    }

    #[test]
    fn equal_order_keeps_registration_order() {
        // Given
        let mut registry = Registry::new();

        // When
        let a = registry.register(noop(), 1);
        let b = registry.register(noop(), 0);
        let c = registry.register(noop(), 1);
        let d = registry.register(noop(), 0);

        // Then
        assert_eq!(run_order(&mut registry), vec![b, d, a, c]);
        assert_eq!(registry.get_mut(2).unwrap().order(), 1);
    }
}
