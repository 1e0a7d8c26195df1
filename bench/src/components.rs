//! Component types shared by the workloads.

use sprocket_macros::Component;

/// 2D position (8 bytes).
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Remaining life.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Life {
    pub life: f32,
}

/// Sprite with a heap-allocated path, so moves are not plain memcpy of a few floats.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct Sprite {
    pub path: String,
    pub animation_time: f32,
}
