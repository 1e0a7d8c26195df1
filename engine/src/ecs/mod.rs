pub mod component;
pub(crate) mod composition;
pub mod entity;
pub mod error;
pub mod query;
pub mod schedule;
pub(crate) mod storage;
pub mod system;
pub(crate) mod util;
pub mod world;

pub use component::Component;
pub use entity::Entity;
pub use error::{Error, Result};
pub use query::{Filter, Matches, Query};
pub use schedule::State;
pub use system::{Failure, System};
pub use world::{Config, World};

pub use sprocket_macros::Component;
