//! Combined decode: framing + packet decoding as one lazy sequence.
//!
//! This is the externally consumed producer. It holds no state beyond the
//! framer cursor, counters and the skipped-packet log.

pub mod config;
pub mod types;
pub mod sequence;

pub use config::{DecodeConfig, DecodeMode};
pub use types::{DecodeState, DecodedRecording, SkippedPacket};
pub use sequence::{decode_all, DecodeSequence};
