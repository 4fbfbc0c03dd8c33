//! Utility Module
//!
//! - [`time`]: platform-neutral `Instant` and the per-scene [`SceneClock`]

pub mod time;

pub use time::SceneClock;
