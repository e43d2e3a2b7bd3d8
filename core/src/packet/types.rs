use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::packet::wire::WireType;

/// Three-axis reading (gyroscope or accelerometer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rotation quaternion; `w` is the scalar part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub const fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// One decoded IMU datapoint.
///
/// Values are copied out of the packet payload; a sample never borrows
/// from the raw buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub timestamp_ns: u64,
    pub gyro: Vector3,
    pub accel: Vector3,
    pub rotation: Quaternion,
}

impl MotionSample {
    pub const fn new(timestamp_ns: u64, gyro: Vector3, accel: Vector3, rotation: Quaternion) -> Self {
        Self {
            timestamp_ns,
            gyro,
            accel,
            rotation,
        }
    }

    /// Float columns in export order (everything after `timestamp_ns`).
    pub fn values(&self) -> [f64; 10] {
        [
            self.gyro.x,
            self.gyro.y,
            self.gyro.z,
            self.accel.x,
            self.accel.y,
            self.accel.z,
            self.rotation.w,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        ]
    }
}

bitflags::bitflags! {
    /// Top-level `ImuPacket` fields seen while decoding one payload.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldPresence: u8 {
        const TIMESTAMP = 0b0000_0001;
        const GYRO      = 0b0000_0010;
        const ACCEL     = 0b0000_0100;
        const ROTATION  = 0b0000_1000;

        const REQUIRED = Self::TIMESTAMP.bits()
            | Self::GYRO.bits()
            | Self::ACCEL.bits()
            | Self::ROTATION.bits();
    }
}

impl FieldPresence {
    /// Wire name of the first required field not yet seen.
    pub fn first_missing(self) -> Option<&'static str> {
        [
            (FieldPresence::TIMESTAMP, "tsNs"),
            (FieldPresence::GYRO, "gyroData"),
            (FieldPresence::ACCEL, "accelData"),
            (FieldPresence::ROTATION, "rotVecData"),
        ]
        .into_iter()
        .find(|(flag, _)| !self.contains(*flag))
        .map(|(_, name)| name)
    }

    pub fn require_all(self) -> Result<(), PacketError> {
        match self.first_missing() {
            Some(name) => Err(PacketError::MissingField(name)),
            None => Ok(()),
        }
    }
}

/// Schema-level failure while decoding one packet payload.
///
/// `at` offsets are relative to the start of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacketError {
    #[error("unexpected end of payload at byte {at}: need {needed}, have {remaining}")]
    UnexpectedEof {
        at: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("varint at byte {at} is longer than 10 bytes")]
    VarintOverflow { at: usize },

    #[error("invalid field number {field} at byte {at}")]
    InvalidFieldNumber { at: usize, field: u64 },

    #[error("invalid wire type {raw} at byte {at}")]
    InvalidWireType { at: usize, raw: u8 },

    #[error("unsupported wire type {wire_type:?} at byte {at}")]
    UnsupportedWireType { at: usize, wire_type: WireType },

    #[error("field {field_number} of `{message}` has wire type {actual:?}")]
    WireTypeMismatch {
        message: &'static str,
        field_number: u32,
        actual: WireType,
    },

    #[error("required field `{0}` missing")]
    MissingField(&'static str),
}
