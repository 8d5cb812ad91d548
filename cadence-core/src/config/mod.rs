//! Configuration types
//!
//! Scheduler tuning that a board may persist in flash as postcard binary
//! data (with the `serde` feature) or bake in at build time.

pub mod types;

pub use types::*;
