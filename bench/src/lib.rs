//! Benchmark workloads for the sprocket ECS.
//!
//! Three workloads exercise the engine the way a game loop would:
//!
//! - **add_remove**: create entities holding a [`Position`](components::Position), then destroy
//!   them all
//! - **simple**: one system moving every positioned entity
//! - **complex**: two systems that keep changing which query each entity matches, so caches,
//!   hooks and the composition index all churn every tick
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p sprocket_bench
//!
//! # Run specific benchmark group
//! cargo bench -p sprocket_bench -- complex
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod scenarios;

/// Entities created by each workload.
pub const NUM_ENTITIES: usize = 10_000;

/// Ticks run per iteration of the system workloads.
pub const WORLD_UPDATES: usize = 100;
