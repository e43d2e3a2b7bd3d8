//! telemetry/counters.rs
//! Mutable counters collected while scanning one recording.
//!
//! Converted into an immutable `DecodeSnapshot` when the scan ends.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeCounters {
    /// Records located by the framer (decoded or skipped).
    pub packets_framed: u64,
    pub samples_decoded: u64,
    /// Records dropped in lenient mode.
    pub packets_skipped: u64,
    pub bytes_payload: u64,
    /// Length-prefix bytes.
    pub bytes_overhead: u64,
    /// Samples whose timestamp is lower than the previous sample's.
    pub timestamp_regressions: u64,
    pub first_timestamp_ns: Option<u64>,
    pub last_timestamp_ns: Option<u64>,
}

impl DecodeCounters {
    /// Record one framed packet.
    pub fn add_frame(&mut self, payload_len: usize, prefix_len: usize) {
        self.packets_framed += 1;
        self.bytes_payload += payload_len as u64;
        self.bytes_overhead += prefix_len as u64;
    }

    /// Record one decoded sample. Returns `true` if its timestamp went
    /// backwards relative to the previous sample.
    pub fn add_sample(&mut self, timestamp_ns: u64) -> bool {
        self.samples_decoded += 1;
        self.first_timestamp_ns.get_or_insert(timestamp_ns);

        let regressed = matches!(self.last_timestamp_ns, Some(prev) if timestamp_ns < prev);
        if regressed {
            self.timestamp_regressions += 1;
        }
        self.last_timestamp_ns = Some(timestamp_ns);
        regressed
    }

    pub fn add_skipped(&mut self) {
        self.packets_skipped += 1;
    }

    /// Bytes consumed by framed records.
    pub fn bytes_scanned(&self) -> u64 {
        self.bytes_payload + self.bytes_overhead
    }

    /// Recorded time span, `0` with fewer than two samples.
    pub fn span_ns(&self) -> u64 {
        match (self.first_timestamp_ns, self.last_timestamp_ns) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => 0,
        }
    }

    /// Fold in counters from another scan. Timestamp bounds widen to cover
    /// both; regressions are summed, not recomputed across the boundary.
    pub fn merge(&mut self, other: &DecodeCounters) {
        self.packets_framed += other.packets_framed;
        self.samples_decoded += other.samples_decoded;
        self.packets_skipped += other.packets_skipped;
        self.bytes_payload += other.bytes_payload;
        self.bytes_overhead += other.bytes_overhead;
        self.timestamp_regressions += other.timestamp_regressions;

        self.first_timestamp_ns = min_opt(self.first_timestamp_ns, other.first_timestamp_ns);
        self.last_timestamp_ns = max_opt(self.last_timestamp_ns, other.last_timestamp_ns);
    }
}

fn min_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

fn max_opt(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    }
}

impl AddAssign for DecodeCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}
