//! telemetry/mod.rs
//! Decode telemetry: counters, stage timers and immutable snapshots.
//!
//! Counters are owned by a single `DecodeSequence` (no atomics); batch
//! decoding merges them after the workers finish.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
