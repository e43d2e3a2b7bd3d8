//! Tabular sinks for decoded samples.
//!
//! Both formats use the fixed `CSV_COLUMNS` order / names, one row per
//! sample, in sequence order.

use std::io::Write;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::constants::CSV_COLUMNS;
use crate::packet::MotionSample;
use crate::stream::DecodeSequence;
use crate::telemetry::Stage;
use crate::types::ImuError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Csv,
    JsonLines,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::JsonLines => "jsonl",
        }
    }
}

/// Flat datapoint keyed by the export column names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImuDatapoint {
    pub timestamp_ns: u64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub rotvec_w: f64,
    pub rotvec_x: f64,
    pub rotvec_y: f64,
    pub rotvec_z: f64,
}

impl From<&MotionSample> for ImuDatapoint {
    fn from(s: &MotionSample) -> Self {
        Self {
            timestamp_ns: s.timestamp_ns,
            gyro_x: s.gyro.x,
            gyro_y: s.gyro.y,
            gyro_z: s.gyro.z,
            accel_x: s.accel.x,
            accel_y: s.accel.y,
            accel_z: s.accel.z,
            rotvec_w: s.rotation.w,
            rotvec_x: s.rotation.x,
            rotvec_y: s.rotation.y,
            rotvec_z: s.rotation.z,
        }
    }
}

pub trait SampleSink {
    fn write_sample(&mut self, sample: &MotionSample) -> Result<(), ImuError>;

    /// Flush buffered rows. Must be safe to call more than once.
    fn finish(&mut self) -> Result<(), ImuError>;

    fn rows_written(&self) -> u64;
}

/// CSV with a header row. The header is written even for empty recordings.
pub struct CsvSink<W: Write> {
    inner: W,
    header_written: bool,
    rows: u64,
}

impl<W: Write> CsvSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, header_written: false, rows: 0 }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn ensure_header(&mut self) -> Result<(), ImuError> {
        if !self.header_written {
            writeln!(self.inner, "{}", CSV_COLUMNS.join(","))?;
            self.header_written = true;
        }
        Ok(())
    }
}

impl<W: Write> SampleSink for CsvSink<W> {
    fn write_sample(&mut self, sample: &MotionSample) -> Result<(), ImuError> {
        self.ensure_header()?;

        // `{:?}` keeps a decimal point on whole numbers and round-trips f64.
        write!(self.inner, "{}", sample.timestamp_ns)?;
        for v in sample.values() {
            write!(self.inner, ",{:?}", v)?;
        }
        self.inner.write_all(b"\n")?;

        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ImuError> {
        self.ensure_header()?;
        self.inner.flush()?;
        Ok(())
    }

    fn rows_written(&self) -> u64 {
        self.rows
    }
}

/// One JSON object per line.
pub struct JsonLinesSink<W: Write> {
    inner: W,
    rows: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, rows: 0 }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> SampleSink for JsonLinesSink<W> {
    fn write_sample(&mut self, sample: &MotionSample) -> Result<(), ImuError> {
        serde_json::to_writer(&mut self.inner, &ImuDatapoint::from(sample))?;
        self.inner.write_all(b"\n")?;
        self.rows += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ImuError> {
        self.inner.flush()?;
        Ok(())
    }

    fn rows_written(&self) -> u64 {
        self.rows
    }
}

/// Boxed sink for the requested format.
pub fn sink_for<W: Write + 'static>(format: ExportFormat, inner: W) -> Box<dyn SampleSink> {
    match format {
        ExportFormat::Csv => Box::new(CsvSink::new(inner)),
        ExportFormat::JsonLines => Box::new(JsonLinesSink::new(inner)),
    }
}

/// Drain `seq` into `sink`, returning the number of rows written.
///
/// Rows written before an error stay in the sink; the sink is flushed in
/// both cases and the sequence error is returned.
pub fn export_samples<S>(seq: &mut DecodeSequence<'_>, sink: &mut S) -> Result<u64, ImuError>
where
    S: SampleSink + ?Sized,
{
    let start_rows = sink.rows_written();

    while let Some(item) = seq.next() {
        let sample = match item {
            Ok(sample) => sample,
            Err(err) => {
                sink.finish()?;
                return Err(err);
            }
        };
        let t = Instant::now();
        sink.write_sample(&sample)?;
        seq.add_stage_time(Stage::Export, t.elapsed());
    }

    sink.finish()?;
    Ok(sink.rows_written() - start_rows)
}
