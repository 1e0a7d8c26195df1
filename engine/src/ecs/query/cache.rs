use fixedbitset::FixedBitSet;

use crate::ecs::{
    component,
    composition::Compositions,
    entity::{self, Entity},
    query::Filter,
};

/// Entities that entered or left a cached match set during one [`Cache::sync`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Changes {
    pub added: Vec<Entity>,
    pub removed: Vec<Entity>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// An incrementally maintained match set for one filter.
///
/// The world marks an entity slot dirty whenever the entity is created or destroyed, or gains
/// or loses a component the filter references. [`sync`](Self::sync) re-evaluates only the dirty
/// slots against the composition index, so a tick with no structural changes costs nothing
/// beyond walking the members.
#[derive(Debug)]
pub struct Cache {
    filter: Filter,

    /// Slots whose entity matched at the last sync.
    members: FixedBitSet,

    /// The matching entity of each member slot, so a member destroyed since the last sync can
    /// still be reported with the handle it had.
    tracked: Vec<Option<Entity>>,

    /// Slots to re-evaluate at the next sync.
    dirty: FixedBitSet,
}

impl Cache {
    /// A cache with every slot below `slots` marked dirty.
    pub fn new(filter: Filter, slots: usize) -> Self {
        let mut dirty = FixedBitSet::with_capacity(slots);
        dirty.insert_range(..);
        Self {
            filter,
            members: FixedBitSet::with_capacity(slots),
            tracked: Vec::new(),
            dirty,
        }
    }

    #[inline]
    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    /// Mark a slot for re-evaluation.
    #[inline]
    pub fn invalidate(&mut self, entity: Entity) {
        let index = entity.index();
        self.dirty.grow(index + 1);
        self.dirty.insert(index);
    }

    /// Mark a slot for re-evaluation if component `id` matters to this filter.
    #[inline]
    pub fn invalidate_component(&mut self, entity: Entity, id: component::Id) {
        if self.filter.references(id) {
            self.invalidate(entity);
        }
    }

    /// Bring the match set up to date with the composition index.
    pub fn sync(&mut self, entities: &entity::Allocator, compositions: &Compositions) -> Changes {
        let mut changes = Changes::default();
        if self.dirty.is_clear() {
            return changes;
        }

        let dirty = std::mem::take(&mut self.dirty);
        for index in dirty.ones() {
            let current = entities
                .entity_at(index)
                .filter(|entity| compositions.matches(*entity, &self.filter));
            let previous = self.tracked.get(index).copied().flatten();

            if previous == current {
                continue;
            }
            if let Some(entity) = previous {
                changes.removed.push(entity);
            }
            if let Some(entity) = current {
                changes.added.push(entity);
            }

            if index >= self.tracked.len() {
                self.tracked.resize(index + 1, None);
            }
            self.tracked[index] = current;
            self.members.grow(index + 1);
            self.members.set(index, current.is_some());
        }

        // Reuse the allocation.
        self.dirty = dirty;
        self.dirty.clear();
        changes
    }

    /// The matching entities as of the last sync, in ascending index order.
    pub fn snapshot(&self) -> Vec<Entity> {
        self.members
            .ones()
            .filter_map(|index| self.tracked[index])
            .collect()
    }

    /// Whether the entity was a member at the last sync.
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.tracked.get(entity.index()).copied().flatten() == Some(entity)
    }

    /// Number of members as of the last sync.
    #[inline]
    pub fn len(&self) -> usize {
        self.members.count_ones(..)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_clear()
    }
}
