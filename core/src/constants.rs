/// Width of the little-endian length prefix in front of every packet.
pub const LENGTH_PREFIX_LEN: usize = 2;

/// Largest payload a single length prefix can describe.
pub const MAX_PACKET_LEN: usize = u16::MAX as usize;

/// Longest legal protobuf varint (10 x 7 bits covers u64).
pub const MAX_VARINT_LEN: usize = 10;

/// Bytes of a rejected payload kept (hex encoded) for diagnostics.
pub const PAYLOAD_PREVIEW_LEN: usize = 16;

/// Field numbers of the vendor `ImuPacket` message.
pub mod imu_fields {
    pub const TIMESTAMP_NS: u32 = 1;
    pub const GYRO: u32 = 2;
    pub const ACCEL: u32 = 3;
    pub const ROTATION: u32 = 4;
}

/// Field numbers shared by the `Vec3` / `RotVec` sub-messages.
/// `W` only exists on the rotation vector.
pub mod vector_fields {
    pub const X: u32 = 1;
    pub const Y: u32 = 2;
    pub const Z: u32 = 3;
    pub const W: u32 = 4;
}

/// Fixed column order of the tabular export.
pub const CSV_COLUMNS: [&str; 11] = [
    "timestamp_ns",
    "gyro_x",
    "gyro_y",
    "gyro_z",
    "accel_x",
    "accel_y",
    "accel_z",
    "rotvec_w",
    "rotvec_x",
    "rotvec_y",
    "rotvec_z",
];

/// Number of decoded samples between progress events in the scan log.
pub const PROGRESS_LOG_INTERVAL: u64 = 10_000;
