use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stream::DecodeState;
use crate::telemetry::counters::DecodeCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Immutable summary of one decode scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodeSnapshot {
    pub state: DecodeState,
    pub packets_framed: u64,
    pub samples_decoded: u64,
    pub packets_skipped: u64,
    pub bytes_payload: u64,
    pub bytes_overhead: u64,
    pub timestamp_regressions: u64,
    pub first_timestamp_ns: Option<u64>,
    pub last_timestamp_ns: Option<u64>,
    /// `packets_skipped / packets_framed`, 0 when nothing was framed.
    pub skip_ratio: f64,
    pub throughput_samples_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl DecodeSnapshot {
    pub fn from(counters: &DecodeCounters, timer: &TelemetryTimer, state: DecodeState) -> Self {
        let elapsed = timer.elapsed();

        let skip_ratio = if counters.packets_framed > 0 {
            counters.packets_skipped as f64 / counters.packets_framed as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.samples_decoded as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            state,
            packets_framed: counters.packets_framed,
            samples_decoded: counters.samples_decoded,
            packets_skipped: counters.packets_skipped,
            bytes_payload: counters.bytes_payload,
            bytes_overhead: counters.bytes_overhead,
            timestamp_regressions: counters.timestamp_regressions,
            first_timestamp_ns: counters.first_timestamp_ns,
            last_timestamp_ns: counters.last_timestamp_ns,
            skip_ratio,
            throughput_samples_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    /// Internal invariants:
    /// - every framed packet was either decoded or skipped (or was the last, failed one)
    /// - skip ratio within [0, 1]
    /// - stage time never exceeds wall time
    pub fn sanity_check(&self) -> bool {
        self.samples_decoded + self.packets_skipped <= self.packets_framed
            && (0.0..=1.0).contains(&self.skip_ratio)
            && self.total_stage_time() <= self.elapsed
    }

    pub fn span_ns(&self) -> u64 {
        match (self.first_timestamp_ns, self.last_timestamp_ns) {
            (Some(first), Some(last)) => last.saturating_sub(first),
            _ => 0,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
