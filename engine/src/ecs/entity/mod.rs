//! Entity identifiers and the registry that hands them out.
//!
//! An [`Entity`] is an index into the world's slot space paired with a [`Generation`]. The
//! index is recycled once an entity is destroyed; the generation of its slot is bumped at the
//! same time so every copy of the old identifier stops resolving:
//!
//! ```rust,ignore
//! let entity = allocator.alloc()?; // Entity { id: 0, generation: 0 }
//! allocator.free(entity);
//! let reused = allocator.alloc()?;  // Entity { id: 0, generation: 1 }
//! assert!(!allocator.is_alive(entity));
//! ```
//!
//! # Index reuse
//!
//! Freed indices go into a min-heap, so allocation always returns the lowest vacant index.
//! Keeping the live range compact keeps the composition index and the per-type index maps
//! dense, and makes ascending-index query scans short.

use std::{cmp::Reverse, collections::BinaryHeap, fmt};

use fixedbitset::FixedBitSet;

use crate::ecs::error::{Error, Result};

/// The generation of an entity slot. Starts at `FIRST` and is bumped each time the slot is
/// vacated. A slot whose generation cannot be bumped any further is retired for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u32);

impl Generation {
    /// The first generation of an entity.
    pub const FIRST: Self = Self(0);

    /// The generation after this one, or `None` once the counter is spent.
    #[inline]
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Get the raw generation value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

/// An entity index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Get the raw index value.
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Id {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// An entity in the world.
///
/// At most one live entity exists per `id`; the `generation` tells whether this particular
/// handle still refers to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    /// The slot index of the entity.
    id: Id,

    /// The generation of the slot when this handle was issued.
    generation: Generation,
}

impl Entity {
    /// Construct a first-generation entity.
    #[cfg(test)]
    #[inline]
    pub(crate) fn new(id: impl Into<Id>) -> Self {
        Self::new_with_generation(id.into(), Generation::FIRST)
    }

    /// The same id at the next generation.
    #[cfg(test)]
    #[inline]
    pub(crate) fn genned(&self) -> Self {
        Self::new_with_generation(self.id, self.generation.next().expect("generation overflow"))
    }

    #[inline]
    pub(crate) const fn new_with_generation(id: Id, generation: Generation) -> Self {
        Self { id, generation }
    }

    /// Get the id of this entity.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Get the generation of this entity.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Get the index of this entity in indexable storage (e.g. Vec).
    #[inline]
    pub fn index(&self) -> usize {
        self.id.0 as usize
    }
}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordered by id first, then generation.
impl Ord for Entity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.id.cmp(&other.id) {
            std::cmp::Ordering::Equal => self.generation.cmp(&other.generation),
            ord => ord,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.id.0, self.generation.0)
    }
}

/// Allocates entity indices, recycles vacated ones and tracks liveness.
///
/// Owned by a single world and only mutated through `&mut self`.
#[derive(Debug)]
pub struct Allocator {
    /// Current generation of every slot ever handed out, indexed by entity id.
    generations: Vec<Generation>,

    /// Bit N is set while slot N holds a live entity.
    alive: FixedBitSet,

    /// Vacated slots, lowest index on top.
    dead_pool: BinaryHeap<Reverse<u32>>,

    /// Number of live entities.
    live: usize,

    /// Exclusive upper bound of the index space.
    limit: u32,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new(u32::MAX)
    }
}

impl Allocator {
    /// Construct an allocator whose indices stay below `limit`.
    pub fn new(limit: u32) -> Self {
        Self::with_capacity(limit, 0)
    }

    /// Construct an allocator with room for `capacity` slots before reallocating.
    pub fn with_capacity(limit: u32, capacity: usize) -> Self {
        Self {
            generations: Vec::with_capacity(capacity),
            alive: FixedBitSet::with_capacity(capacity),
            dead_pool: BinaryHeap::new(),
            live: 0,
            limit,
        }
    }

    /// Allocate the lowest vacant index.
    ///
    /// Fails with [`Error::CapacityExhausted`] once every index below the limit is live.
    pub fn alloc(&mut self) -> Result<Entity> {
        let id = match self.dead_pool.pop() {
            Some(Reverse(id)) => id,
            None => {
                let next = self.generations.len();
                if next >= self.limit as usize {
                    return Err(Error::CapacityExhausted { limit: self.limit });
                }
                self.generations.push(Generation::FIRST);
                self.alive.grow(next + 1);
                next as u32
            }
        };

        self.alive.insert(id as usize);
        self.live += 1;
        Ok(Entity::new_with_generation(
            Id(id),
            self.generations[id as usize],
        ))
    }

    /// Allocate `count` entities, lowest indices first.
    ///
    /// On exhaustion nothing stays allocated.
    pub fn alloc_many(&mut self, count: usize) -> Result<Vec<Entity>> {
        let fresh = self.limit as usize - self.generations.len().min(self.limit as usize);
        if count > self.dead_pool.len() + fresh {
            return Err(Error::CapacityExhausted { limit: self.limit });
        }

        let mut alloced = Vec::with_capacity(count);
        for _ in 0..count {
            alloced.push(self.alloc()?);
        }
        Ok(alloced)
    }

    /// Vacate the entity's slot and bump its generation.
    ///
    /// A slot on its last generation is not recycled, so no later entity can share a handle
    /// with one already issued. Returns `false` if the entity was already dead or the handle is
    /// stale.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }

        let index = entity.index();
        self.alive.set(index, false);
        self.live -= 1;
        match self.generations[index].next() {
            Some(next) => {
                self.generations[index] = next;
                self.dead_pool.push(Reverse(entity.id.0));
            }
            None => log::debug!("retired entity slot {index} after its last generation"),
        }
        true
    }

    /// Check whether the handle refers to the live entity of its slot.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let index = entity.index();
        self.alive.contains(index) && self.generations[index] == entity.generation
    }

    /// Get the live entity occupying slot `index`, if any.
    #[inline]
    pub fn entity_at(&self, index: usize) -> Option<Entity> {
        self.alive
            .contains(index)
            .then(|| Entity::new_with_generation(Id(index as u32), self.generations[index]))
    }

    /// Iterate live entities in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .ones()
            .map(|index| Entity::new_with_generation(Id(index as u32), self.generations[index]))
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no entity is live.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever handed out (live or vacant).
    #[inline]
    pub fn slots(&self) -> usize {
        self.generations.len()
    }

    /// Exclusive upper bound of the index space.
    #[inline]
    pub fn limit(&self) -> u32 {
        self.limit
    }
}
