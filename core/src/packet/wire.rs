//! Minimal protobuf wire-format reader / writer.
//!
//! Only what the IMU schema needs: keys, varints, fixed32/fixed64 and
//! length-delimited sub-messages. Groups are rejected.

use byteorder::{ByteOrder, LittleEndian};
use num_enum::TryFromPrimitive;

use crate::constants::MAX_VARINT_LEN;
use crate::packet::types::PacketError;

/// Largest field number protobuf allows (2^29 - 1).
pub const MAX_FIELD_NUMBER: u64 = (1 << 29) - 1;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum WireType {
    Varint     = 0,
    I64        = 1,
    Len        = 2,
    StartGroup = 3,
    EndGroup   = 4,
    I32        = 5,
}

/// Forward-only cursor over one message body.
///
/// `base` is the absolute offset of `buf` inside the top-level payload so
/// nested readers report offsets the caller can map back to the packet.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: usize,
    key_at: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_base(buf, 0)
    }

    fn with_base(buf: &'a [u8], base: usize) -> Self {
        Self {
            buf,
            pos: 0,
            base,
            key_at: base,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Absolute offset of the cursor.
    #[inline]
    pub fn offset(&self) -> usize {
        self.base + self.pos
    }

    pub fn read_varint(&mut self) -> Result<u64, PacketError> {
        let start = self.offset();
        let mut value = 0u64;

        for i in 0..MAX_VARINT_LEN {
            let Some(&byte) = self.buf.get(self.pos) else {
                return Err(PacketError::UnexpectedEof {
                    at: self.offset(),
                    needed: 1,
                    remaining: 0,
                });
            };
            self.pos += 1;

            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }

        Err(PacketError::VarintOverflow { at: start })
    }

    /// Read a field key, returning `(field_number, wire_type)`.
    pub fn read_key(&mut self) -> Result<(u32, WireType), PacketError> {
        let at = self.offset();
        self.key_at = at;

        let key = self.read_varint()?;
        let field = key >> 3;
        let raw = (key & 0x07) as u8;

        if field == 0 || field > MAX_FIELD_NUMBER {
            return Err(PacketError::InvalidFieldNumber { at, field });
        }
        let wire_type = WireType::try_from(raw)
            .map_err(|_| PacketError::InvalidWireType { at, raw })?;

        Ok((field as u32, wire_type))
    }

    /// Borrow the next `n` bytes.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], PacketError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(PacketError::UnexpectedEof {
                at: self.offset(),
                needed: n,
                remaining,
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_fixed32(&mut self) -> Result<u32, PacketError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_fixed64(&mut self) -> Result<u64, PacketError> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    /// Read a length-delimited body and return a reader scoped to it.
    pub fn read_len_delimited(&mut self) -> Result<WireReader<'a>, PacketError> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        let base = self.offset();
        let body = self.take(len)?;
        Ok(WireReader::with_base(body, base))
    }

    /// Skip the value of an unknown field.
    pub fn skip(&mut self, wire_type: WireType) -> Result<(), PacketError> {
        match wire_type {
            WireType::Varint => self.read_varint().map(|_| ()),
            WireType::I64 => self.take(8).map(|_| ()),
            WireType::I32 => self.take(4).map(|_| ()),
            WireType::Len => self.read_len_delimited().map(|_| ()),
            WireType::StartGroup | WireType::EndGroup => Err(PacketError::UnsupportedWireType {
                at: self.key_at,
                wire_type,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Writer helpers
// ---------------------------------------------------------------------------

pub fn put_varint(out: &mut Vec<u8>, mut value: u64) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

pub fn put_key(out: &mut Vec<u8>, field: u32, wire_type: WireType) {
    put_varint(out, (u64::from(field) << 3) | wire_type as u64);
}

pub fn put_fixed32(out: &mut Vec<u8>, value: u32) {
    let mut b = [0u8; 4];
    LittleEndian::write_u32(&mut b, value);
    out.extend_from_slice(&b);
}

pub fn put_fixed64(out: &mut Vec<u8>, value: u64) {
    let mut b = [0u8; 8];
    LittleEndian::write_u64(&mut b, value);
    out.extend_from_slice(&b);
}

pub fn put_len_delimited(out: &mut Vec<u8>, field: u32, body: &[u8]) {
    put_key(out, field, WireType::Len);
    put_varint(out, body.len() as u64);
    out.extend_from_slice(body);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_matches_protobuf_reference_bytes() {
        // 150 -> 0x96 0x01 (protobuf encoding guide)
        let mut out = Vec::new();
        put_varint(&mut out, 150);
        assert_eq!(out, [0x96, 0x01]);

        let mut r = WireReader::new(&out);
        assert_eq!(r.read_varint().unwrap(), 150);
        assert!(r.is_empty());
    }

    #[test]
    fn varint_u64_max_uses_ten_bytes() {
        let mut out = Vec::new();
        put_varint(&mut out, u64::MAX);
        assert_eq!(out.len(), MAX_VARINT_LEN);
        assert_eq!(WireReader::new(&out).read_varint().unwrap(), u64::MAX);
    }

    #[test]
    fn eleven_byte_varint_overflows() {
        let buf = [0xffu8; 11];
        assert_eq!(
            WireReader::new(&buf).read_varint(),
            Err(PacketError::VarintOverflow { at: 0 })
        );
    }

    #[test]
    fn key_with_field_zero_is_rejected() {
        let buf = [0x05u8]; // field 0, wire type I32
        assert!(matches!(
            WireReader::new(&buf).read_key(),
            Err(PacketError::InvalidFieldNumber { at: 0, field: 0 })
        ));
    }

    #[test]
    fn key_with_wire_type_seven_is_rejected() {
        let buf = [0x0fu8]; // field 1, wire type 7
        assert!(matches!(
            WireReader::new(&buf).read_key(),
            Err(PacketError::InvalidWireType { at: 0, raw: 7 })
        ));
    }

    #[test]
    fn nested_reader_reports_absolute_offsets() {
        let mut out = Vec::new();
        put_len_delimited(&mut out, 2, &[0x0d, 0x00]); // truncated fixed32 inside
        let mut r = WireReader::new(&out);
        r.read_key().unwrap();
        let mut sub = r.read_len_delimited().unwrap();
        assert_eq!(sub.offset(), 2);
        sub.read_key().unwrap();
        assert_eq!(
            sub.read_fixed32(),
            Err(PacketError::UnexpectedEof { at: 3, needed: 4, remaining: 1 })
        );
    }

    #[test]
    fn groups_cannot_be_skipped() {
        let buf = [0x0bu8]; // field 1, start group
        let mut r = WireReader::new(&buf);
        let (_, wt) = r.read_key().unwrap();
        assert_eq!(
            r.skip(wt),
            Err(PacketError::UnsupportedWireType { at: 0, wire_type: WireType::StartGroup })
        );
    }
}
