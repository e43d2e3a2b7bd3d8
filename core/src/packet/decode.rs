use crate::constants::{imu_fields, vector_fields};
use crate::packet::types::{FieldPresence, MotionSample, PacketError, Quaternion, Vector3};
use crate::packet::wire::{WireReader, WireType};

/// Decode one packet payload into a `MotionSample`.
///
/// Schema (`ImuPacket`):
///
/// ```text
/// 1 tsNs       fixed64 (varint accepted)
/// 2 gyroData   { 1 x, 2 y, 3 z }        float (double accepted)
/// 3 accelData  { 1 x, 2 y, 3 z }        float (double accepted)
/// 4 rotVecData { 1 x, 2 y, 3 z, 4 w }   float (double accepted)
/// ```
///
/// All four top-level fields are required. Unknown fields are skipped,
/// repeated sub-messages are merged and the last scalar wins.
pub fn decode_motion_sample(payload: &[u8]) -> Result<MotionSample, PacketError> {
    let mut reader = WireReader::new(payload);
    let mut sample = MotionSample::default();
    let mut seen = FieldPresence::empty();

    while !reader.is_empty() {
        let (field, wire_type) = reader.read_key()?;
        match field {
            imu_fields::TIMESTAMP_NS => {
                sample.timestamp_ns = read_timestamp(&mut reader, wire_type)?;
                seen |= FieldPresence::TIMESTAMP;
            }
            imu_fields::GYRO => {
                let mut body = sub_message(&mut reader, wire_type, field)?;
                merge_vector3(&mut body, &mut sample.gyro, "gyroData")?;
                seen |= FieldPresence::GYRO;
            }
            imu_fields::ACCEL => {
                let mut body = sub_message(&mut reader, wire_type, field)?;
                merge_vector3(&mut body, &mut sample.accel, "accelData")?;
                seen |= FieldPresence::ACCEL;
            }
            imu_fields::ROTATION => {
                let mut body = sub_message(&mut reader, wire_type, field)?;
                merge_quaternion(&mut body, &mut sample.rotation)?;
                seen |= FieldPresence::ROTATION;
            }
            _ => reader.skip(wire_type)?,
        }
    }

    seen.require_all()?;
    Ok(sample)
}

fn read_timestamp(reader: &mut WireReader<'_>, wire_type: WireType) -> Result<u64, PacketError> {
    match wire_type {
        WireType::I64 => reader.read_fixed64(),
        WireType::Varint => reader.read_varint(),
        actual => Err(PacketError::WireTypeMismatch {
            message: "ImuPacket",
            field_number: imu_fields::TIMESTAMP_NS,
            actual,
        }),
    }
}

fn sub_message<'a>(
    reader: &mut WireReader<'a>,
    wire_type: WireType,
    field_number: u32,
) -> Result<WireReader<'a>, PacketError> {
    if wire_type != WireType::Len {
        return Err(PacketError::WireTypeMismatch {
            message: "ImuPacket",
            field_number,
            actual: wire_type,
        });
    }
    reader.read_len_delimited()
}

/// One float component; `float` on the wire, widened to f64.
fn read_component(
    reader: &mut WireReader<'_>,
    wire_type: WireType,
    message: &'static str,
    field_number: u32,
) -> Result<f64, PacketError> {
    match wire_type {
        WireType::I32 => Ok(f64::from(f32::from_bits(reader.read_fixed32()?))),
        WireType::I64 => Ok(f64::from_bits(reader.read_fixed64()?)),
        actual => Err(PacketError::WireTypeMismatch {
            message,
            field_number,
            actual,
        }),
    }
}

fn merge_vector3(
    body: &mut WireReader<'_>,
    out: &mut Vector3,
    message: &'static str,
) -> Result<(), PacketError> {
    while !body.is_empty() {
        let (field, wire_type) = body.read_key()?;
        match field {
            vector_fields::X => out.x = read_component(body, wire_type, message, field)?,
            vector_fields::Y => out.y = read_component(body, wire_type, message, field)?,
            vector_fields::Z => out.z = read_component(body, wire_type, message, field)?,
            _ => body.skip(wire_type)?,
        }
    }
    Ok(())
}

fn merge_quaternion(body: &mut WireReader<'_>, out: &mut Quaternion) -> Result<(), PacketError> {
    const MESSAGE: &str = "rotVecData";

    while !body.is_empty() {
        let (field, wire_type) = body.read_key()?;
        match field {
            vector_fields::X => out.x = read_component(body, wire_type, MESSAGE, field)?,
            vector_fields::Y => out.y = read_component(body, wire_type, MESSAGE, field)?,
            vector_fields::Z => out.z = read_component(body, wire_type, MESSAGE, field)?,
            vector_fields::W => out.w = read_component(body, wire_type, MESSAGE, field)?,
            _ => body.skip(wire_type)?,
        }
    }
    Ok(())
}
