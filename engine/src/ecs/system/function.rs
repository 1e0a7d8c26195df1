//! Closure-backed systems with a name and optional hooks.
//!
//! ```rust,ignore
//! let system = Function::new("age", |world: &mut World, entity, delta| {
//!     if let Some(life) = world.get_mut::<Life>(entity) {
//!         life.life -= delta;
//!     }
//!     Ok(())
//! })
//! .on_added(|_, entity| log::info!("{entity} is aging"))
//! .on_removed(|_, entity| log::info!("{entity} stopped aging"));
//!
//! world.register_system(Query::new().with::<Life>(), system, 0)?;
//! ```

use crate::ecs::{
    entity::Entity,
    system::{Failure, System},
    world::World,
};

type Hook = Box<dyn FnMut(&mut World, Entity)>;

/// A named system built from closures.
pub struct Function<F> {
    name: String,
    process: F,
    on_added: Option<Hook>,
    on_removed: Option<Hook>,
}

impl<F> Function<F>
where
    F: FnMut(&mut World, Entity, f32) -> Result<(), Failure> + 'static,
{
    pub fn new(name: impl Into<String>, process: F) -> Self {
        Self {
            name: name.into(),
            process,
            on_added: None,
            on_removed: None,
        }
    }

    /// Run `hook` for each entity that starts matching.
    pub fn on_added(mut self, hook: impl FnMut(&mut World, Entity) + 'static) -> Self {
        self.on_added = Some(Box::new(hook));
        self
    }

    /// Run `hook` for each entity that stops matching or is destroyed.
    pub fn on_removed(mut self, hook: impl FnMut(&mut World, Entity) + 'static) -> Self {
        self.on_removed = Some(Box::new(hook));
        self
    }
}

impl<F> System for Function<F>
where
    F: FnMut(&mut World, Entity, f32) -> Result<(), Failure> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&mut self, world: &mut World, entity: Entity, delta: f32) -> Result<(), Failure> {
        (self.process)(world, entity, delta)
    }

    fn on_added(&mut self, world: &mut World, entity: Entity) {
        if let Some(hook) = &mut self.on_added {
            hook(world, entity);
        }
    }

    fn on_removed(&mut self, world: &mut World, entity: Entity) {
        if let Some(hook) = &mut self.on_removed {
            hook(world, entity);
        }
    }
}
