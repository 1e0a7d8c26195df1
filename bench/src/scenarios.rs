//! Workload setups and per-iteration bodies.
//!
//! Each function here is what one benchmark iteration runs, so the same code is measured by
//! criterion and checked by the tests below.

use sprocket_ecs::ecs::{Entity, Error, Failure, Query, World, system::Function};

use crate::components::{Life, Position, Sprite};

/// Create `count` entities with a [`Position`], then destroy them.
pub fn add_remove(world: &mut World, count: usize) {
    let entities: Vec<Entity> = (0..count)
        .map(|_| world.spawn(Position::default()))
        .collect();
    for entity in entities {
        world.destroy(entity);
    }
}

/// A world of `count` positioned entities and one system moving them along x.
pub fn simple(count: usize) -> Result<World, Error> {
    let mut world = World::new();
    for _ in 0..count {
        world.spawn(Position::default());
    }

    world.register_system(
        Query::new().with::<Position>(),
        Function::new(
            "move",
            |world: &mut World, entity: Entity, _: f32| -> Result<(), Failure> {
                if let Some(position) = world.get_mut::<Position>(entity) {
                    position.x += 1.0;
                }
                Ok(())
            },
        ),
        0,
    )?;
    Ok(world)
}

/// A world of `count` entities holding a [`Position`] and a [`Sprite`], with two systems that
/// shuffle components between ticks.
///
/// The first system runs over entities with a position, no life and a sprite. On every other
/// call it moves the entity and gives it a [`Life`]; on the rest it takes the position away.
/// Either way the entity stops matching. The second runs over anything holding one of the three
/// types, strips its life and gives back a position, which makes it match the first again.
pub fn complex(count: usize) -> Result<World, Error> {
    let mut world = World::new();
    for _ in 0..count {
        world.spawn((
            Position::default(),
            Sprite {
                path: "sprite.png".to_string(),
                animation_time: 0.0,
            },
        ));
    }

    let mut calls: u64 = 0;
    world.register_system(
        Query::new()
            .with::<Position>()
            .without::<Life>()
            .any_of::<Sprite>(),
        Function::new(
            "animate",
            move |world: &mut World, entity: Entity, _: f32| -> Result<(), Failure> {
                if calls % 2 == 0 {
                    if let Some(position) = world.get_mut::<Position>(entity) {
                        position.x += 1.0;
                    }
                    world.attach(entity, Life::default())?;
                } else {
                    world.detach::<Position>(entity);
                }
                if let Some(sprite) = world.get_mut::<Sprite>(entity) {
                    sprite.animation_time += 1.0;
                }
                calls += 1;
                Ok(())
            },
        ),
        0,
    )?;

    world.register_system(
        Query::new()
            .any_of::<Position>()
            .any_of::<Life>()
            .any_of::<Sprite>(),
        Function::new(
            "revive",
            |world: &mut World, entity: Entity, _: f32| -> Result<(), Failure> {
                world.detach::<Life>(entity);
                if !world.has::<Position>(entity) {
                    world.attach(entity, Position::default())?;
                }
                Ok(())
            },
        ),
        1,
    )?;
    Ok(world)
}

/// Tick `world` `updates` times with a delta of one.
pub fn run(world: &mut World, updates: usize) -> Result<(), Error> {
    for _ in 0..updates {
        world.tick(1.0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_leaves_the_world_empty() {
        // Given
        let mut world = World::new();

        // When
        add_remove(&mut world, 1_000);
        add_remove(&mut world, 1_000);

        // Then
        assert!(world.is_empty());
        assert_eq!(world.components::<Position>().count(), 0);
        assert!(world.check_invariants().is_ok());
    }

    #[test]
    fn simple_moves_every_entity_once_per_tick() {
        // Given
        let mut world = simple(100).unwrap();

        // When
        run(&mut world, 10).unwrap();

        // Then
        assert!(world.components::<Position>().all(|(_, p)| p.x == 10.0));
        assert_eq!(world.ticks(), 10);
    }

    #[test]
    fn complex_alternates_between_systems() {
        // Given
        let mut world = complex(4).unwrap();
        let entities: Vec<_> = world.entities().collect();

        // When - First system: calls 0 and 2 gain life, calls 1 and 3 lose their position.
        // Second system then strips life and restores positions.
        run(&mut world, 1).unwrap();

        // Then
        for (n, entity) in entities.iter().enumerate() {
            assert!(world.has::<Position>(*entity));
            assert!(!world.has::<Life>(*entity));
            assert_eq!(world.get::<Sprite>(*entity).unwrap().animation_time, 1.0);
            let x = world.get::<Position>(*entity).unwrap().x;
            assert_eq!(x, if n % 2 == 0 { 1.0 } else { 0.0 });
        }
        assert!(world.check_invariants().is_ok());
    }

    #[test]
    fn complex_keeps_running() {
        // Given
        let mut world = complex(100).unwrap();

        // When
        run(&mut world, 20).unwrap();

        // Then
        assert_eq!(world.len(), 100);
        assert!(
            world
                .components::<Sprite>()
                .all(|(_, sprite)| sprite.animation_time == 20.0)
        );
        assert!(world.check_invariants().is_ok());
    }
}
