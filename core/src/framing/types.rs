use thiserror::Error;

use crate::constants::LENGTH_PREFIX_LEN;

/// One length-prefixed record, borrowed from the raw buffer.
///
/// `offset` points at the length prefix; the payload starts
/// `LENGTH_PREFIX_LEN` bytes later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketRecord<'a> {
    pub offset: usize,
    pub length: usize,
    pub payload: &'a [u8],
}

impl<'a> PacketRecord<'a> {
    /// Offset of the first payload byte.
    #[inline]
    pub fn payload_offset(&self) -> usize {
        self.offset + LENGTH_PREFIX_LEN
    }

    /// Offset one past the last payload byte (start of the next record).
    #[inline]
    pub fn end(&self) -> usize {
        self.payload_offset() + self.length
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Buffer ends inside a 2-byte length prefix.
    #[error("truncated length prefix at offset {offset}: {available} of 2 bytes present")]
    TruncatedPrefix { offset: usize, available: usize },

    /// Length prefix promises more bytes than the buffer holds.
    #[error("truncated packet at offset {offset}: declared {declared} bytes, {available} available")]
    TruncatedPayload {
        offset: usize,
        declared: usize,
        available: usize,
    },

    /// Payload cannot be described by a u16 prefix.
    #[error("packet payload too large: {len} > {max}")]
    PayloadTooLarge { len: usize, max: usize },
}

impl FrameError {
    /// Offset of the record that failed to frame.
    pub fn offset(&self) -> Option<usize> {
        match self {
            FrameError::TruncatedPrefix { offset, .. } => Some(*offset),
            FrameError::TruncatedPayload { offset, .. } => Some(*offset),
            FrameError::PayloadTooLarge { .. } => None,
        }
    }
}
