//! imu-core
//!
//! Pure Rust decoder for raw IMU recordings: length-prefixed protobuf
//! motion packets in, ordered `MotionSample`s out.
//! No CLI, no file discovery.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

// Decode layers
pub mod framing;
pub mod packet;
pub mod stream;

// Around the decoder
pub mod telemetry;
pub mod io;
pub mod export;
pub mod batch;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::framing::{FrameError, PacketFramer, PacketRecord};
    pub use crate::packet::{decode_motion_sample, MotionSample, PacketError, Quaternion, Vector3};
    pub use crate::stream::{decode_all, DecodeConfig, DecodeMode, DecodeSequence, DecodeState};
    pub use crate::types::{DecodeFailure, ImuError};
}
