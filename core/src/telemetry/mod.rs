//! telemetry/mod.rs
//! Counters, stage timers and immutable snapshots for depadding streams.
//!
//! Counters are owned by the engine and updated on every call; snapshots are
//! taken once a stream has been finalized.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
