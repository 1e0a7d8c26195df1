//! Systems: per-entity logic bound to a query and run once per tick.
//!
//! # Overview
//!
//! A [`System`] is registered on a [`World`](world::World) together with a
//! [`Query`](crate::ecs::Query) and an order key. Every tick the scheduler hands it each entity
//! matching the query, one at a time, along with the tick's delta:
//!
//! ```rust,ignore
//! world.register_system(
//!     Query::new().with::<Position>(),
//!     |world: &mut World, entity: Entity, delta: f32| {
//!         if let Some(pos) = world.get_mut::<Position>(entity) {
//!             pos.x += delta;
//!         }
//!         Ok(())
//!     },
//!     0,
//! )?;
//! ```
//!
//! Any `FnMut(&mut World, Entity, f32) -> Result<(), Failure>` closure is a system. Implement
//! the trait directly, or wrap a closure in [`Function`], to get a readable name and the
//! `on_added`/`on_removed` hook pair.
//!
//! # Hooks
//!
//! At the start of its pass each system's match set is brought up to date. Entities that
//! stopped matching since the previous pass (including destroyed ones) are reported to
//! [`System::on_removed`], then entities that started matching are reported to
//! [`System::on_added`]. Destroyed entities are reported with their old handle and can no
//! longer be read.
//!
//! # Mutation
//!
//! Systems receive the whole world mutably and may create, destroy, attach and detach freely.
//! The entities a pass visits are fixed when the pass starts: new matches wait for the next
//! tick, and entities that are destroyed or stop matching before their turn are skipped.

use crate::ecs::{entity::Entity, world};

pub mod function;
pub mod registry;

pub use function::Function;
pub use registry::Registry;

/// Error type returned by system callbacks.
pub type Failure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A system identifier, assigned in registration order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this system in indexable storage (e.g. Vec).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Logic run for every entity matching a system's query.
pub trait System: 'static {
    /// Name used in logs and errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Process one matching entity.
    ///
    /// Returning an error abandons the rest of the tick; mutations already made stay applied.
    fn process(
        &mut self,
        world: &mut world::World,
        entity: Entity,
        delta: f32,
    ) -> Result<(), Failure>;

    /// Called once when an entity starts matching this system's query.
    fn on_added(&mut self, _world: &mut world::World, _entity: Entity) {}

    /// Called once when an entity stops matching this system's query or is destroyed.
    fn on_removed(&mut self, _world: &mut world::World, _entity: Entity) {}
}

impl<F> System for F
where
    F: FnMut(&mut world::World, Entity, f32) -> Result<(), Failure> + 'static,
{
    fn process(
        &mut self,
        world: &mut world::World,
        entity: Entity,
        delta: f32,
    ) -> Result<(), Failure> {
        self(world, entity, delta)
    }
}
