//! Engine services that sit beside the ECS.

pub mod log;
