use crate::constants::{imu_fields, vector_fields};
use crate::packet::types::{MotionSample, Quaternion, Vector3};
use crate::packet::wire::{put_fixed32, put_fixed64, put_key, put_len_delimited, WireType};

/// Encoded size of a sample written by `encode_motion_sample`.
///
/// ```text
/// tsNs        1 + 8
/// gyroData    2 + 3 * (1 + 4)
/// accelData   2 + 3 * (1 + 4)
/// rotVecData  2 + 4 * (1 + 4)
/// ```
pub const ENCODED_SAMPLE_LEN: usize = 9 + 17 + 17 + 22;

/// Encode a sample in the vendor layout: fixed64 timestamp, f32 components,
/// every field present (zeros included).
///
/// Components are narrowed to f32, so only f32-representable values
/// survive a round trip bit-exactly.
pub fn encode_motion_sample(sample: &MotionSample) -> Vec<u8> {
    let mut out = Vec::with_capacity(ENCODED_SAMPLE_LEN);

    put_key(&mut out, imu_fields::TIMESTAMP_NS, WireType::I64);
    put_fixed64(&mut out, sample.timestamp_ns);

    put_len_delimited(&mut out, imu_fields::GYRO, &encode_vector3(&sample.gyro));
    put_len_delimited(&mut out, imu_fields::ACCEL, &encode_vector3(&sample.accel));
    put_len_delimited(&mut out, imu_fields::ROTATION, &encode_quaternion(&sample.rotation));

    debug_assert_eq!(out.len(), ENCODED_SAMPLE_LEN, "encoded sample length drifted");
    out
}

fn put_float(out: &mut Vec<u8>, field: u32, value: f64) {
    put_key(out, field, WireType::I32);
    put_fixed32(out, (value as f32).to_bits());
}

fn encode_vector3(v: &Vector3) -> Vec<u8> {
    let mut body = Vec::with_capacity(15);
    put_float(&mut body, vector_fields::X, v.x);
    put_float(&mut body, vector_fields::Y, v.y);
    put_float(&mut body, vector_fields::Z, v.z);
    body
}

fn encode_quaternion(q: &Quaternion) -> Vec<u8> {
    let mut body = Vec::with_capacity(20);
    put_float(&mut body, vector_fields::X, q.x);
    put_float(&mut body, vector_fields::Y, q.y);
    put_float(&mut body, vector_fields::Z, q.z);
    put_float(&mut body, vector_fields::W, q.w);
    body
}
