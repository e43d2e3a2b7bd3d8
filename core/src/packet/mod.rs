//! Motion packet schema.
//!
//! Responsibilities:
//! - Decode one packet payload (protobuf `ImuPacket`) into a `MotionSample`
//! - Encode samples in the same layout for fixtures and re-export
//!
//! Non-responsibilities:
//! - Finding packet boundaries (see `framing`)

pub mod types;
pub mod wire;
pub mod encode;
pub mod decode;

pub use types::{
    FieldPresence,
    MotionSample,
    PacketError,
    Quaternion,
    Vector3,
};
pub use encode::{encode_motion_sample, ENCODED_SAMPLE_LEN};
pub use decode::decode_motion_sample;
