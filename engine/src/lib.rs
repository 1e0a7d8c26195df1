//! A single-threaded Entity Component System runtime.
//!
//! The [`ecs::World`] owns every piece of state: the entity registry, one dense store per
//! component type, the composition index and the registered systems. A driver creates entities,
//! attaches components and calls [`ecs::World::tick`] once per frame.
//!
//! ```rust,ignore
//! use sprocket_ecs::ecs::{Component, Query, World};
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut world = World::new();
//! world.spawn(Position { x: 0.0, y: 0.0 });
//! world.register_system(
//!     Query::new().with::<Position>(),
//!     |world: &mut World, entity, delta| {
//!         if let Some(pos) = world.get_mut::<Position>(entity) {
//!             pos.x += delta;
//!         }
//!         Ok(())
//!     },
//!     0,
//! )?;
//! world.tick(1.0)?;
//! ```

// Lets `#[derive(Component)]` expand to `::sprocket_ecs::...` inside this crate too.
extern crate self as sprocket_ecs;

pub mod core;
pub mod ecs;
