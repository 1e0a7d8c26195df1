//! Component types and their per-world identifiers.
//!
//! A component is any `'static` value type deriving [`Component`]. Each world maps every
//! component type it has seen to a dense [`Id`] exactly once, in its [`Registry`]; from then on
//! stores, compositions and filters are addressed by that id and never inspect the Rust type.
//!
//! ```ignore
//! use sprocket_ecs::ecs::Component;
//!
//! #[derive(Component)]
//! struct Position { x: f32, y: f32 }
//!
//! let mut registry = Registry::new();
//! let pos_id = registry.register::<Position>();
//! ```

mod registry;
mod set;

pub use registry::Registry;
pub use set::{Set, Target};

/// A component identifier, dense within one world.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u32);

impl Id {
    /// Construct a new component Id from a raw u32 value.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the index of this component in indexable storage (e.g. Vec, bitset).
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<usize> for Id {
    #[inline]
    fn from(value: usize) -> Self {
        Self::new(value as u32)
    }
}

/// A trait representing a component in the ECS.
///
/// At present this only sets the required trait bounds for a type to be used as a component.
pub trait Component: 'static + Sized + Send + Sync {}
