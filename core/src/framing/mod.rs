//! Length-prefixed packet framing.
//!
//! Responsibilities:
//! - Locate packet boundaries in a raw recording buffer
//! - Write the same `[len: u16 LE][payload]` layout back out
//! - Report truncated prefixes / payloads as typed errors
//!
//! Non-responsibilities:
//! - Payload contents (see `packet`)
//! - IO

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    FrameError,
    PacketRecord,
};
pub use encode::{
    encode_packet,
    frame_packets,
};
pub use decode::PacketFramer;
