//! Log sinks for the `log` facade.
//!
//! The engine only emits records through `log`: `debug!` when types and systems are registered,
//! `trace!` per created or destroyed entity and per tick, `warn!` when a system callback fails.
//! Drivers install whichever sink they like; [`ChannelLogger`] forwards records to another
//! thread, which suits a frame loop that must not block on I/O.

mod channel;

pub use channel::{ChannelLogger, LogMessage};
