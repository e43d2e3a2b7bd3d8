use std::io;
use thiserror::Error;

use crate::framing::FrameError;
use crate::packet::PacketError;

/// A payload that failed schema decoding, with its position in the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("packet {packet_index} at offset {offset} ({length} bytes): {source}")]
pub struct DecodeFailure {
    /// Zero-based index of the record among all framed records.
    pub packet_index: u64,
    /// Offset of the record's length prefix.
    pub offset: usize,
    /// Payload length.
    pub length: usize,
    #[source]
    pub source: PacketError,
}

/// Unified error covering framing, schema decoding, I/O and export.
/// - `From<T>` impls enable `?` across io / export / batch.
#[derive(Debug, Error)]
pub enum ImuError {
    /// Length prefix or payload cut off at end of buffer. Always fatal.
    #[error("truncated frame: {0}")]
    TruncatedFrame(#[from] FrameError),

    /// Payload does not match the motion-sample schema.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeFailure),

    /// Lenient mode skipped more packets than the configured budget.
    #[error("skip budget exceeded: {skipped} packets skipped, limit {limit}")]
    SkipBudgetExceeded { skipped: usize, limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic validation with a descriptive message.
    #[error("validation error: {0}")]
    Validation(String),
}

impl ImuError {
    /// True for errors produced by the decode sequence itself.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            ImuError::TruncatedFrame(_) | ImuError::Decode(_) | ImuError::SkipBudgetExceeded { .. }
        )
    }
}
