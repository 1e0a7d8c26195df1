//! The World is the central container for all entities, components, and systems in the ECS.
//!
//! A `World` owns every piece of ECS state and is the only way to reach it. Worlds share
//! nothing, so several can live side by side on different threads.
//!
//! # Architecture
//!
//! The World coordinates several subsystems:
//! - **Entity Allocator**: issues `(index, generation)` handles and recycles vacated indices
//! - **Component Registry**: maps each Rust component type to a dense id
//! - **Storage**: one dense column per component type
//! - **Compositions**: the set of component ids each entity holds
//! - **Schedule**: registered systems, their match-set caches and the tick loop
//!
//! Every structural mutation updates the column and the composition in the same call and marks
//! the entity dirty in each system cache whose query could change its verdict.
//!
//! # Example
//!
//! ```ignore
//! use sprocket_ecs::ecs::{Query, World};
//!
//! let mut world = World::new();
//!
//! let entity = world.spawn(Position { x: 0.0, y: 0.0 });
//! world.attach(entity, Sprite::default())?;
//!
//! world.register_system(Query::new().with::<Position>(), move_right, 0)?;
//! world.tick(1.0 / 60.0)?;
//!
//! world.destroy(entity);
//! ```
mod config;

use std::{any::type_name, borrow::Cow, marker::PhantomData};

pub use config::Config;

use crate::ecs::{
    component::{self, Component},
    composition::Compositions,
    entity::{self, Entity},
    error::{Error, Result},
    query::{self, Filter, Matches, Query},
    schedule::{self, Schedule},
    storage::Storage,
    system,
};

/// The World is the central container for all entities, components, and their relationships.
pub struct World {
    config: Config,

    /// The world's entity allocator.
    entities: entity::Allocator,

    /// Component types seen by this world.
    components: component::Registry,

    /// The storage for components in the world.
    storage: Storage,

    /// Which components each entity holds.
    compositions: Compositions,

    /// Match-set cache of each registered system, indexed by system id.
    caches: Vec<query::Cache>,

    schedule: Schedule,

    /// Marker to make World !Send. World must stay on the thread that drives it.
    _not_send: PhantomData<*mut ()>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            entities: entity::Allocator::with_capacity(config.max_entities, config.capacity),
            components: component::Registry::new(),
            storage: Storage::default(),
            compositions: Compositions::with_capacity(config.capacity),
            caches: Vec::new(),
            schedule: Schedule::new(),
            _not_send: PhantomData,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create an entity with no components.
    ///
    /// # Panics
    ///
    /// If the entity identifier space is exhausted. Use [`try_create`](Self::try_create) to
    /// handle that case.
    pub fn create(&mut self) -> Entity {
        self.try_create().unwrap_or_else(|error| panic!("{error}"))
    }

    /// Create an entity with no components, reusing the lowest vacant index.
    pub fn try_create(&mut self) -> Result<Entity> {
        let entity = self.entities.alloc()?;
        self.establish(entity);
        Ok(entity)
    }

    /// Create `count` entities with no components, lowest indices first.
    ///
    /// # Panics
    ///
    /// If fewer than `count` identifiers are available. Nothing is created in that case.
    pub fn create_many(&mut self, count: usize) -> Vec<Entity> {
        let entities = self
            .entities
            .alloc_many(count)
            .unwrap_or_else(|error| panic!("{error}"));
        for entity in &entities {
            self.establish(*entity);
        }
        entities
    }

    /// Create an entity holding every component in `set`.
    ///
    /// # Panics
    ///
    /// If the entity identifier space is exhausted.
    pub fn spawn<S: component::Set>(&mut self, set: S) -> Entity {
        self.try_spawn(set).unwrap_or_else(|error| panic!("{error}"))
    }

    /// Create an entity holding every component in `set`.
    pub fn try_spawn<S: component::Set>(&mut self, set: S) -> Result<Entity> {
        let entity = self.try_create()?;
        let mut spawn = Spawn {
            world: self,
            entity,
            error: None,
        };
        set.apply(&mut spawn);
        match spawn.error {
            Some(error) => Err(error),
            None => Ok(entity),
        }
    }

    fn establish(&mut self, entity: Entity) {
        self.compositions.reset(entity);
        for cache in &mut self.caches {
            cache.invalidate(entity);
        }
        log::trace!("created {entity}");
    }

    /// Destroy the entity and release all of its components.
    ///
    /// Returns `false`, doing nothing, if the entity is already dead or the handle is stale.
    ///
    /// # Panics
    ///
    /// With an [`Error::InvariantViolation`] message if the entity's composition names a
    /// component its store does not hold.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }

        let composition = self.compositions.take(entity);
        for index in composition.ones() {
            let id = component::Id::from(index);
            if !self.storage.release(id, entity) {
                let name = self.components.name(id).unwrap_or("<unregistered>");
                panic!(
                    "{}",
                    Error::InvariantViolation(format!(
                        "{entity} holds {name} but its store has no row for it"
                    ))
                );
            }
        }

        self.entities.free(entity);
        for cache in &mut self.caches {
            cache.invalidate(entity);
        }
        log::trace!("destroyed {entity}");
        true
    }

    /// Whether the handle refers to a live entity.
    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live entities in ascending index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    /// Attach `value` to the entity, returning the value it replaced.
    ///
    /// Fails with [`Error::StaleEntity`] if the entity is dead.
    pub fn attach<C: Component>(&mut self, entity: Entity, value: C) -> Result<Option<C>> {
        if !self.entities.is_alive(entity) {
            return Err(Error::StaleEntity(entity));
        }

        let id = self.components.register::<C>();
        let previous = self
            .storage
            .column_or_insert::<C>(id)
            .ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "the store for {id:?} does not hold {}",
                    type_name::<C>()
                ))
            })?
            .insert(entity, value);

        let added = self.compositions.attach(entity, id);
        if added != previous.is_none() {
            return Err(Error::InvariantViolation(format!(
                "{entity} composition and {} store disagree",
                type_name::<C>()
            )));
        }

        if added {
            for cache in &mut self.caches {
                cache.invalidate_component(entity, id);
            }
        }
        Ok(previous)
    }

    /// Detach and return the entity's `C`.
    ///
    /// Returns `None` if the entity is dead or does not hold a `C`.
    ///
    /// # Panics
    ///
    /// With an [`Error::InvariantViolation`] message if the composition and the store disagree.
    pub fn detach<C: Component>(&mut self, entity: Entity) -> Option<C> {
        if !self.entities.is_alive(entity) {
            return None;
        }

        let id = self.components.get::<C>()?;
        let removed = self
            .storage
            .column_mut::<C>(id)
            .and_then(|column| column.remove(entity));
        let held = self.compositions.detach(entity, id);

        match (held, removed) {
            (true, Some(value)) => {
                for cache in &mut self.caches {
                    cache.invalidate_component(entity, id);
                }
                Some(value)
            }
            (false, None) => None,
            _ => panic!(
                "{}",
                Error::InvariantViolation(format!(
                    "{entity} composition and {} store disagree",
                    type_name::<C>()
                ))
            ),
        }
    }

    /// The entity's `C`, if it is alive and holds one.
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        let id = self.components.get::<C>()?;
        self.storage.column::<C>(id)?.get(entity)
    }

    /// Mutable access to the entity's `C`, if it is alive and holds one.
    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        let id = self.components.get::<C>()?;
        self.storage.column_mut::<C>(id)?.get_mut(entity)
    }

    /// Whether the entity is alive and holds a `C`.
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
            && self
                .components
                .get::<C>()
                .is_some_and(|id| self.compositions.contains(entity, id))
    }

    /// Every `(entity, value)` pair of component `C`, in store order.
    pub fn components<C: Component>(&self) -> impl Iterator<Item = (Entity, &C)> + '_ {
        self.components
            .get::<C>()
            .and_then(|id| self.storage.column::<C>(id))
            .into_iter()
            .flat_map(|column| column.iter())
    }

    /// Validate `query` and resolve it against this world.
    pub fn filter(&mut self, query: &Query) -> Result<Filter> {
        Filter::resolve(query, &mut self.components)
    }

    /// Whether the entity is alive and its composition satisfies `filter`.
    #[inline]
    pub fn matches(&self, entity: Entity, filter: &Filter) -> bool {
        self.entities.is_alive(entity) && self.compositions.matches(entity, filter)
    }

    /// The live entities matching `query`, scanned lazily in ascending index order.
    pub fn resolve(&mut self, query: &Query) -> Result<Matches<'_>> {
        let filter = self.filter(query)?;
        Ok(Matches::new(
            &self.entities,
            &self.compositions,
            Cow::Owned(filter),
        ))
    }

    /// The live entities matching an already resolved filter.
    pub fn resolve_filter<'w>(&'w self, filter: &'w Filter) -> Matches<'w> {
        Matches::new(&self.entities, &self.compositions, Cow::Borrowed(filter))
    }

    /// Register a system run every tick over the entities matching `query`.
    ///
    /// Systems run in ascending `order`; equal orders run in registration order.
    pub fn register_system<S: system::System>(
        &mut self,
        query: Query,
        system: S,
        order: i32,
    ) -> Result<system::Id> {
        if self.schedule.state() == schedule::State::Ticking {
            return Err(Error::Ticking);
        }

        let filter = Filter::resolve(&query, &mut self.components)?;
        let id = self.schedule.register(Box::new(system), order)?;
        debug_assert_eq!(id.index(), self.caches.len());
        self.caches
            .push(query::Cache::new(filter, self.entities.slots()));
        Ok(id)
    }

    /// Run every registered system once.
    pub fn tick(&mut self, delta: f32) -> Result<()> {
        schedule::tick(self, delta)
    }

    #[inline]
    pub fn state(&self) -> schedule::State {
        self.schedule.state()
    }

    /// Delta of the tick in progress, or of the last tick.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.schedule.delta()
    }

    /// Number of ticks that ran every system to completion.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.schedule.ticks()
    }

    /// Number of registered systems, also while a tick is running.
    #[inline]
    pub fn systems(&self) -> usize {
        self.caches.len()
    }

    /// Audit the stores against the composition index.
    pub fn check_invariants(&self) -> Result<()> {
        for (id, column) in self.storage.columns() {
            column.audit().map_err(Error::InvariantViolation)?;
            let name = self.components.name(id).unwrap_or("<unregistered>");
            for entity in column.entities() {
                if !self.entities.is_alive(*entity) {
                    return Err(Error::InvariantViolation(format!(
                        "{name} store holds a row for dead {entity}"
                    )));
                }
                if !self.compositions.contains(*entity, id) {
                    return Err(Error::InvariantViolation(format!(
                        "{name} store holds a row for {entity} but its composition lacks it"
                    )));
                }
            }
        }

        for entity in self.entities.iter() {
            for index in self.compositions.get(entity).ones() {
                let id = component::Id::from(index);
                if !self
                    .storage
                    .erased(id)
                    .is_some_and(|column| column.contains(entity))
                {
                    let name = self.components.name(id).unwrap_or("<unregistered>");
                    return Err(Error::InvariantViolation(format!(
                        "{entity} holds {name} but its store has no row for it"
                    )));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    #[inline]
    pub(crate) fn cache(&self, id: system::Id) -> &query::Cache {
        &self.caches[id.index()]
    }

    /// Bring a system's match set up to date.
    pub(crate) fn sync_cache(&mut self, id: system::Id) -> query::Changes {
        self.caches[id.index()].sync(&self.entities, &self.compositions)
    }
}

/// Applies a component set to a freshly created entity, keeping the first error.
struct Spawn<'w> {
    world: &'w mut World,
    entity: Entity,
    error: Option<Error>,
}

impl component::Target for Spawn<'_> {
    fn apply<C: Component>(&mut self, value: C) {
        if self.error.is_none()
            && let Err(error) = self.world.attach(self.entity, value)
        {
            self.error = Some(error);
        }
    }
}
