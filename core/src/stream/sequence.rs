use std::iter::FusedIterator;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::constants::{LENGTH_PREFIX_LEN, PROGRESS_LOG_INTERVAL};
use crate::framing::PacketFramer;
use crate::packet::{decode_motion_sample, MotionSample, ENCODED_SAMPLE_LEN};
use crate::stream::config::{DecodeConfig, DecodeMode};
use crate::stream::types::{DecodeState, DecodedRecording, SkippedPacket};
use crate::telemetry::{DecodeCounters, DecodeSnapshot, Stage, TelemetryTimer};
use crate::types::{DecodeFailure, ImuError};

/// Lazy, ordered sequence of motion samples decoded from one raw buffer.
///
/// Each call to `next` frames and decodes exactly one packet (more in
/// lenient mode when packets are skipped). Errors end the sequence:
/// after yielding `Err` the iterator returns `None`.
pub struct DecodeSequence<'a> {
    framer: PacketFramer<'a>,
    config: DecodeConfig,
    state: DecodeState,
    packet_index: u64,
    counters: DecodeCounters,
    skipped: Vec<SkippedPacket>,
    timer: TelemetryTimer,
}

impl<'a> DecodeSequence<'a> {
    pub fn new(buf: &'a [u8], config: DecodeConfig) -> Self {
        debug!(bytes = buf.len(), mode = ?config.mode, "starting imu decode");
        Self {
            framer: PacketFramer::new(buf),
            config,
            state: DecodeState::Scanning,
            packet_index: 0,
            counters: DecodeCounters::default(),
            skipped: Vec::new(),
            timer: TelemetryTimer::new(),
        }
    }

    pub fn strict(buf: &'a [u8]) -> Self {
        Self::new(buf, DecodeConfig::strict())
    }

    pub fn lenient(buf: &'a [u8]) -> Self {
        Self::new(buf, DecodeConfig::lenient())
    }

    pub fn state(&self) -> DecodeState {
        self.state
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn counters(&self) -> &DecodeCounters {
        &self.counters
    }

    /// Packets dropped so far (lenient mode).
    pub fn skipped(&self) -> &[SkippedPacket] {
        &self.skipped
    }

    pub fn take_skipped(&mut self) -> Vec<SkippedPacket> {
        std::mem::take(&mut self.skipped)
    }

    /// Offset of the next length prefix.
    pub fn position(&self) -> usize {
        self.framer.position()
    }

    /// Charge time spent by a downstream consumer (e.g. a sink) to this scan.
    pub fn add_stage_time(&mut self, stage: Stage, dur: Duration) {
        self.timer.add_stage_time(stage, dur);
    }

    pub fn snapshot(&self) -> DecodeSnapshot {
        DecodeSnapshot::from(&self.counters, &self.timer, self.state)
    }

    fn finish(&mut self, state: DecodeState) {
        self.state = state;
        self.timer.finish();
        debug!(
            state = ?state,
            samples = self.counters.samples_decoded,
            skipped = self.counters.packets_skipped,
            regressions = self.counters.timestamp_regressions,
            "imu decode finished"
        );
    }
}

impl<'a> Iterator for DecodeSequence<'a> {
    type Item = Result<MotionSample, ImuError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.state.is_terminal() {
                return None;
            }
            self.state = DecodeState::Scanning;

            let framed = self.timer.time(Stage::Frame, || self.framer.next());
            let record = match framed {
                None => {
                    self.finish(DecodeState::Done);
                    return None;
                }
                Some(Err(err)) => {
                    self.finish(DecodeState::TruncatedError);
                    return Some(Err(ImuError::TruncatedFrame(err)));
                }
                Some(Ok(record)) => record,
            };

            let packet_index = self.packet_index;
            self.packet_index += 1;
            self.counters.add_frame(record.length, LENGTH_PREFIX_LEN);

            let decoded = self.timer.time(Stage::Decode, || decode_motion_sample(record.payload));
            let source = match decoded {
                Ok(sample) => {
                    trace!(packet_index, offset = record.offset, timestamp_ns = sample.timestamp_ns, "decoded packet");
                    if self.counters.add_sample(sample.timestamp_ns) {
                        debug!(packet_index, timestamp_ns = sample.timestamp_ns, "timestamp went backwards");
                    }
                    if self.counters.samples_decoded % PROGRESS_LOG_INTERVAL == 0 {
                        debug!(samples = self.counters.samples_decoded, offset = self.framer.position(), "imu decode progress");
                    }
                    self.state = DecodeState::Emitting;
                    return Some(Ok(sample));
                }
                Err(source) => source,
            };

            let failure = DecodeFailure {
                packet_index,
                offset: record.offset,
                length: record.length,
                source,
            };

            match self.config.mode {
                DecodeMode::Strict => {
                    self.finish(DecodeState::DecodeError);
                    return Some(Err(ImuError::Decode(failure)));
                }
                DecodeMode::Lenient => {
                    warn!(
                        packet_index,
                        offset = record.offset,
                        length = record.length,
                        error = %failure.source,
                        "skipping malformed imu packet"
                    );
                    self.counters.add_skipped();
                    self.skipped.push(SkippedPacket::new(failure, record.payload));

                    if let Some(limit) = self.config.max_skipped {
                        if self.skipped.len() > limit {
                            let skipped = self.skipped.len();
                            self.finish(DecodeState::DecodeError);
                            return Some(Err(ImuError::SkipBudgetExceeded { skipped, limit }));
                        }
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.state.is_terminal() {
            return (0, Some(0));
        }
        self.framer.size_hint()
    }
}

impl FusedIterator for DecodeSequence<'_> {}

/// Decode a whole buffer and collect the samples.
///
/// Stops at the first error the configured mode does not absorb.
pub fn decode_all(buf: &[u8], config: DecodeConfig) -> Result<DecodedRecording, ImuError> {
    config.validate()?;

    let mut seq = DecodeSequence::new(buf, config);
    let mut samples = Vec::with_capacity(buf.len() / (LENGTH_PREFIX_LEN + ENCODED_SAMPLE_LEN));
    for item in seq.by_ref() {
        samples.push(item?);
    }

    Ok(DecodedRecording {
        samples,
        skipped: seq.take_skipped(),
        counters: seq.counters().clone(),
        snapshot: seq.snapshot(),
    })
}
