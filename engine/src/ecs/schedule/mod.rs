//! The tick loop.
//!
//! A [`Schedule`] owns a world's registered systems and runs them, in order, once per
//! [`World::tick`](world::World::tick):
//!
//! ```text
//! Idle ──tick(delta)──► Ticking ──every system ran, or one failed──► Idle
//! ```
//!
//! Each system's pass has three steps:
//! 1. Sync the system's match-set cache and fire `on_removed`, then `on_added`, hooks.
//! 2. Snapshot the matching entities in ascending index order.
//! 3. Call `process` for each snapshot entity that is still alive and still matches.
//!
//! The snapshot is taken once, so entities that start matching during the pass are visited on
//! the next tick and no entity is visited twice. A failing callback ends the tick: the rest of
//! that system's snapshot and every later system are skipped, the error is returned to the
//! caller, and the schedule goes back to [`State::Idle`].

use crate::ecs::{
    error::{Error, Result},
    system::{self, registry::Entry},
    world,
};

/// Scheduler state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum State {
    #[default]
    Idle,
    Ticking,
}

/// The registered systems of one world and the state of its tick loop.
#[derive(Default)]
pub struct Schedule {
    state: State,
    systems: system::Registry,

    /// Delta of the tick in progress, or of the last tick.
    delta: f32,

    /// Ticks that ran every system to completion.
    ticks: u64,
}

impl Schedule {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Add a system. Fails while a tick is running.
    pub fn register(&mut self, system: Box<dyn system::System>, order: i32) -> Result<system::Id> {
        if self.state == State::Ticking {
            return Err(Error::Ticking);
        }
        let name = system.name().to_string();
        let id = self.systems.register(system, order);
        log::debug!("registered system `{name}` as {id:?} with order {order}");
        Ok(id)
    }
}

/// Run one tick of `world`'s schedule.
pub(crate) fn tick(world: &mut world::World, delta: f32) -> Result<()> {
    let schedule = world.schedule_mut();
    if schedule.state == State::Ticking {
        return Err(Error::Ticking);
    }
    schedule.state = State::Ticking;
    schedule.delta = delta;

    // Systems need the world mutably while they run, so the registry is moved out for the
    // duration of the tick. Registration is refused while Ticking, so nothing is lost.
    // `World::systems` counts caches, which stay put.
    let mut systems = std::mem::take(&mut schedule.systems);
    log::trace!("tick {} with delta {delta} over {} systems", schedule.ticks, systems.len());

    let result = systems
        .iter_mut()
        .try_for_each(|entry| run_system(world, entry, delta));

    let schedule = world.schedule_mut();
    schedule.systems = systems;
    schedule.state = State::Idle;
    if result.is_ok() {
        schedule.ticks += 1;
    }
    result
}

fn run_system(world: &mut world::World, entry: &mut Entry, delta: f32) -> Result<()> {
    let id = entry.id();
    let changes = world.sync_cache(id);
    let system = entry.system();

    for entity in changes.removed {
        system.on_removed(world, entity);
    }
    for entity in changes.added {
        system.on_added(world, entity);
    }

    let snapshot = world.cache(id).snapshot();
    log::trace!("system `{}` visiting {} entities", system.name(), snapshot.len());

    for entity in snapshot {
        // Destroyed or changed by an earlier callback in this pass.
        if !world.is_alive(entity) || !world.matches(entity, world.cache(id).filter()) {
            continue;
        }

        if let Err(source) = system.process(world, entity, delta) {
            log::warn!("system `{}` failed on {entity}: {source}", system.name());
            return Err(Error::CallbackFailure {
                system: system.name().to_string(),
                entity,
                source,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::ecs::{
        Component, Entity, Query,
        system::{Failure, Function},
        world::World,
    };

    #[derive(Component, Debug, Default, Clone, PartialEq)]
    struct Position {
        x: f32,
    }

    #[derive(Component, Debug, Default, Clone, PartialEq)]
    struct Life {
        life: f32,
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn record(log: &Log, message: impl Into<String>) {
        log.borrow_mut().push(message.into());
    }

    #[test]
    fn tick_moves_through_states() {
        // Given
        let mut world = World::new();
        let observed = Rc::new(RefCell::new(Vec::new()));
        let seen = observed.clone();
        world.spawn(Position::default());
        world
            .register_system(
                Query::new(),
                move |world: &mut World, _: Entity, _: f32| -> Result<(), Failure> {
                    seen.borrow_mut().push(world.state());
                    Ok(())
                },
                0,
            )
            .unwrap();
        assert_eq!(world.state(), State::Idle);

        // When
        world.tick(0.5).unwrap();

        // Then
        assert_eq!(*observed.borrow(), vec![State::Ticking]);
        assert_eq!(world.state(), State::Idle);
        assert_eq!(world.delta(), 0.5);
        assert_eq!(world.ticks(), 1);
    }

    #[test]
    fn systems_run_in_order_then_registration() {
        // Given
        let mut world = World::new();
        let log: Log = Rc::default();
        world.spawn(Position::default());
        for (name, order) in [("late", 5), ("first", -1), ("second", 5), ("early", 0)] {
            let log = log.clone();
            world
                .register_system(
                    Query::new(),
                    move |_: &mut World, _: Entity, _: f32| -> Result<(), Failure> {
                        record(&log, name);
                        Ok(())
                    },
                    order,
                )
                .unwrap();
        }

        // When
        world.tick(1.0).unwrap();

        // Then
        assert_eq!(*log.borrow(), vec!["first", "early", "late", "second"]);
    }

    #[test]
    fn each_system_sees_mutations_of_earlier_systems() {
        // Given
        let mut world = World::new();
        let entity = world.spawn(Position::default());
        world
            .register_system(
                Query::new().with::<Position>(),
                |world: &mut World, entity: Entity, _: f32| -> Result<(), Failure> {
                    world.attach(entity, Life { life: 3.0 })?;
                    Ok(())
                },
                0,
            )
            .unwrap();
        let visited: Rc<RefCell<Vec<Entity>>> = Rc::default();
        let seen = visited.clone();
        world
            .register_system(
                Query::new().with::<Life>(),
                move |_: &mut World, entity: Entity, _: f32| -> Result<(), Failure> {
                    seen.borrow_mut().push(entity);
                    Ok(())
                },
                1,
            )
            .unwrap();

        // When
        world.tick(1.0).unwrap();

        // Then
        assert_eq!(*visited.borrow(), vec![entity]);
    }

    #[test]
    fn failure_aborts_the_tick_and_returns_to_idle() {
        // Given
        let mut world = World::new();
        let log: Log = Rc::default();
        let entities = world.create_many(3);
        for entity in &entities {
            world.attach(*entity, Position::default()).unwrap();
        }
        let failing = entities[1];
        let first = log.clone();
        world
            .register_system(
                Query::new().with::<Position>(),
                Function::new(
                    "fails-on-second",
                    move |_: &mut World, entity: Entity, _: f32| -> Result<(), Failure> {
                        record(&first, format!("first {entity}"));
                        if entity == failing {
                            return Err("boom".into());
                        }
                        Ok(())
                    },
                ),
                0,
            )
            .unwrap();
        let second = log.clone();
        world
            .register_system(
                Query::new().with::<Position>(),
                move |_: &mut World, entity: Entity, _: f32| -> Result<(), Failure> {
                    record(&second, format!("second {entity}"));
                    Ok(())
                },
                1,
            )
            .unwrap();

        // When
        let result = world.tick(1.0);

        // Then - The rest of the first pass and the second system were skipped
        match result {
            Err(Error::CallbackFailure {
                system,
                entity,
                source,
            }) => {
                assert_eq!(system, "fails-on-second");
                assert_eq!(entity, failing);
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("expected CallbackFailure, got {other:?}"),
        }
        assert_eq!(
            *log.borrow(),
            vec![format!("first {}", entities[0]), format!("first {failing}")]
        );
        assert_eq!(world.state(), State::Idle);
        assert_eq!(world.ticks(), 0);
        assert!(world.check_invariants().is_ok());

        // When - The next tick runs every system again
        log.borrow_mut().clear();
        let _ = world.tick(1.0);

        // Then
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn nested_tick_and_registration_are_refused() {
        // Given
        let mut world = World::new();
        world.spawn(Position::default());
        let errors: Log = Rc::default();
        let seen = errors.clone();
        world
            .register_system(
                Query::new(),
                move |world: &mut World, _: Entity, _: f32| -> Result<(), Failure> {
                    record(&seen, format!("systems {}", world.systems()));
                    if let Err(error) = world.tick(1.0) {
                        record(&seen, error.to_string());
                    }
                    let noop = |_: &mut World, _: Entity, _: f32| -> Result<(), Failure> { Ok(()) };
                    if let Err(error) = world.register_system(Query::new(), noop, 0) {
                        record(&seen, error.to_string());
                    }
                    Ok(())
                },
                0,
            )
            .unwrap();

        // When
        world.tick(1.0).unwrap();

        // Then
        assert_eq!(
            *errors.borrow(),
            vec![
                "systems 1".to_string(),
                Error::Ticking.to_string(),
                Error::Ticking.to_string()
            ]
        );
        assert_eq!(world.systems(), 1);
    }
}
