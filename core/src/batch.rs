//! Parallel decoding of independent recordings.
//!
//! Each worker owns its own `DecodeSequence`; buffers are shared as
//! `Bytes` so queuing a job never copies the recording.

use bytes::Bytes;
use crossbeam::channel;
use tracing::debug;

use crate::stream::{decode_all, DecodeConfig, DecodedRecording};
use crate::telemetry::DecodeCounters;
use crate::types::ImuError;

/// One recording to decode.
#[derive(Debug, Clone)]
pub struct RecordingJob {
    pub name: String,
    pub buffer: Bytes,
}

impl RecordingJob {
    pub fn new(name: impl Into<String>, buffer: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            buffer: buffer.into(),
        }
    }
}

/// Result for one job. A failing recording does not fail the batch.
#[derive(Debug)]
pub struct RecordingOutcome {
    pub name: String,
    pub result: Result<DecodedRecording, ImuError>,
}

/// Worker count for `jobs` recordings: requested (or one per core),
/// never more than the number of jobs, never zero.
pub fn worker_count(requested: Option<usize>, jobs: usize) -> usize {
    requested
        .unwrap_or_else(num_cpus::get)
        .min(jobs)
        .max(1)
}

/// Decode every job on a worker pool; outcomes come back in input order.
pub fn decode_batch(
    jobs: Vec<RecordingJob>,
    config: &DecodeConfig,
    workers: Option<usize>,
) -> Result<Vec<RecordingOutcome>, ImuError> {
    config.validate()?;

    let total = jobs.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let workers = worker_count(workers, total);
    debug!(recordings = total, workers, "starting batch decode");

    let (job_tx, job_rx) = channel::unbounded::<(usize, RecordingJob)>();
    let (res_tx, res_rx) = channel::unbounded::<(usize, RecordingOutcome)>();

    for entry in jobs.into_iter().enumerate() {
        job_tx
            .send(entry)
            .map_err(|_| ImuError::Validation("batch job queue closed".into()))?;
    }
    drop(job_tx);

    crossbeam::thread::scope(|s| {
        for worker in 0..workers {
            let job_rx = job_rx.clone();
            let res_tx = res_tx.clone();
            let config = config.clone();

            s.spawn(move |_| {
                for (index, job) in job_rx.iter() {
                    debug!(worker, recording = %job.name, bytes = job.buffer.len(), "decoding recording");
                    let result = decode_all(&job.buffer, config.clone());
                    let outcome = RecordingOutcome { name: job.name, result };
                    if res_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
    })
    .map_err(|_| ImuError::Validation("batch decode worker panicked".into()))?;
    drop(res_tx);

    let mut slots: Vec<Option<RecordingOutcome>> = (0..total).map(|_| None).collect();
    for (index, outcome) in res_rx.iter() {
        slots[index] = Some(outcome);
    }

    slots
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ImuError::Validation("batch decode lost a recording".into()))
}

/// Counters of all successful outcomes, merged.
pub fn merged_counters(outcomes: &[RecordingOutcome]) -> DecodeCounters {
    let mut total = DecodeCounters::default();
    for outcome in outcomes {
        if let Ok(rec) = &outcome.result {
            total.merge(&rec.counters);
        }
    }
    total
}
