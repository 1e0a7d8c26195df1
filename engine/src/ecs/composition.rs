//! The composition index: which component types each entity currently holds.
//!
//! One [`FixedBitSet`] per entity slot, bit N set iff the entity holds component id N. This is
//! the authoritative answer to "does entity E match query Q"; query caches are derived from it.
//! The world updates it in the same call that mutates the matching column.

use fixedbitset::FixedBitSet;

use crate::ecs::{component, entity::Entity, query::Filter};

#[derive(Debug, Default)]
pub struct Compositions {
    /// Composition of each entity slot, indexed by entity index.
    sets: Vec<FixedBitSet>,

    /// Returned for slots that were never touched.
    empty: FixedBitSet,
}

impl Compositions {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            sets: Vec::with_capacity(capacity),
            empty: FixedBitSet::new(),
        }
    }

    /// Ensure the entity's slot exists and holds an empty composition.
    pub fn reset(&mut self, entity: Entity) {
        let index = entity.index();
        if index >= self.sets.len() {
            self.sets.resize_with(index + 1, FixedBitSet::new);
        }
        self.sets[index].clear();
    }

    /// Record that the entity holds component `id`. Returns `true` if it did not before.
    pub fn attach(&mut self, entity: Entity, id: component::Id) -> bool {
        let index = entity.index();
        if index >= self.sets.len() {
            self.sets.resize_with(index + 1, FixedBitSet::new);
        }
        let set = &mut self.sets[index];
        set.grow(id.index() + 1);
        !set.put(id.index())
    }

    /// Record that the entity no longer holds component `id`. Returns `true` if it did before.
    pub fn detach(&mut self, entity: Entity, id: component::Id) -> bool {
        match self.sets.get_mut(entity.index()) {
            Some(set) if set.contains(id.index()) => {
                set.set(id.index(), false);
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn contains(&self, entity: Entity, id: component::Id) -> bool {
        self.get(entity).contains(id.index())
    }

    /// The entity's composition; empty for slots never used.
    #[inline]
    pub fn get(&self, entity: Entity) -> &FixedBitSet {
        self.sets.get(entity.index()).unwrap_or(&self.empty)
    }

    /// Clear the entity's composition, returning what it held.
    pub fn take(&mut self, entity: Entity) -> FixedBitSet {
        self.sets
            .get_mut(entity.index())
            .map(std::mem::take)
            .unwrap_or_default()
    }

    /// Test the entity's composition against a resolved query.
    #[inline]
    pub fn matches(&self, entity: Entity, filter: &Filter) -> bool {
        filter.matches(self.get(entity))
    }
}
