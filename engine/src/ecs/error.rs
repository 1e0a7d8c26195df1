//! Error kinds surfaced by the world.
//!
//! Operations on dead entities degrade gracefully: reads return `None`, `destroy` returns
//! `false`, and only `attach` reports [`Error::StaleEntity`] because it has a value to hand
//! back to the caller. Configuration mistakes fail at registration, callback errors fail the
//! tick, and storage corruption is reported as [`Error::InvariantViolation`].

use thiserror::Error;

use crate::ecs::{entity::Entity, system::Failure};

/// Convenience result type for world operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The entity is dead or its generation no longer matches its slot.
    #[error("entity {0} is not alive")]
    StaleEntity(Entity),

    /// A query names the same component type as both required and excluded.
    #[error("invalid query: {} both required and excluded", .overlap.join(", "))]
    InvalidQuery { overlap: Vec<&'static str> },

    /// A system callback returned an error. The rest of that tick was abandoned.
    #[error("system `{system}` failed on entity {entity}")]
    CallbackFailure {
        system: String,
        entity: Entity,
        #[source]
        source: Failure,
    },

    /// Every entity index below the configured limit is in use.
    #[error("entity identifier space exhausted at {limit} live entities")]
    CapacityExhausted { limit: u32 },

    /// The composition index and the component stores disagree.
    #[error("storage invariant violated: {0}")]
    InvariantViolation(String),

    /// Systems were registered or a tick was started from inside a running tick.
    #[error("the world is ticking")]
    Ticking,
}
