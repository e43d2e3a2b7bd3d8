use serde::{Deserialize, Serialize};

use crate::constants::PAYLOAD_PREVIEW_LEN;
use crate::packet::MotionSample;
use crate::telemetry::{DecodeCounters, DecodeSnapshot};
use crate::types::DecodeFailure;

/// Scan state of a `DecodeSequence`.
///
/// ```text
/// Scanning ──ok──► Emitting ──► Scanning
///    │
///    ├── truncated ──► TruncatedError   (terminal)
///    ├── bad payload ► DecodeError      (terminal, strict / budget exceeded)
///    └── clean end ──► Done             (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecodeState {
    Scanning,
    Emitting,
    TruncatedError,
    DecodeError,
    Done,
}

impl DecodeState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            DecodeState::TruncatedError | DecodeState::DecodeError | DecodeState::Done
        )
    }

    pub fn is_error(self) -> bool {
        matches!(self, DecodeState::TruncatedError | DecodeState::DecodeError)
    }
}

/// A packet dropped in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPacket {
    pub failure: DecodeFailure,
    /// Hex of the first payload bytes.
    pub payload_preview: String,
}

impl SkippedPacket {
    pub fn new(failure: DecodeFailure, payload: &[u8]) -> Self {
        let head = &payload[..payload.len().min(PAYLOAD_PREVIEW_LEN)];
        Self {
            failure,
            payload_preview: hex::encode(head),
        }
    }
}

/// Fully collected output of one recording.
#[derive(Debug, Clone)]
pub struct DecodedRecording {
    pub samples: Vec<MotionSample>,
    pub skipped: Vec<SkippedPacket>,
    pub counters: DecodeCounters,
    pub snapshot: DecodeSnapshot,
}
