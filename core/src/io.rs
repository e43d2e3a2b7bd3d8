//! Normalized input / output for raw recordings.
//!
//! The decoder itself only sees `&[u8]`; this module gets the whole file
//! resident first and hands out sinks for exported rows.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::debug;

use crate::types::ImuError;

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

impl InputSource {
    /// Short label for logs.
    pub fn describe(&self) -> String {
        match self {
            InputSource::Reader(_) => "<reader>".to_string(),
            InputSource::File(p) => p.display().to_string(),
            InputSource::Memory(b) => format!("<memory: {} bytes>", b.len()),
        }
    }
}

impl From<PathBuf> for InputSource {
    fn from(p: PathBuf) -> Self {
        InputSource::File(p)
    }
}

impl From<&Path> for InputSource {
    fn from(p: &Path) -> Self {
        InputSource::File(p.to_path_buf())
    }
}

impl From<Vec<u8>> for InputSource {
    fn from(b: Vec<u8>) -> Self {
        InputSource::Memory(b)
    }
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    Stdout,
}

/// Load the full raw buffer. Decoding never starts on a partial file.
pub fn load_raw_buffer(src: InputSource) -> Result<Bytes, ImuError> {
    let label = src.describe();
    let buf = match src {
        InputSource::Memory(b) => b,
        InputSource::File(p) => std::fs::read(&p)?,
        InputSource::Reader(mut r) => {
            let mut b = Vec::new();
            r.read_to_end(&mut b)?;
            b
        }
    };
    debug!(source = %label, bytes = buf.len(), "loaded raw imu buffer");
    Ok(Bytes::from(buf))
}

/// Normalize an output sink into a buffered writer.
pub fn open_output(sink: OutputSink) -> Result<Box<dyn Write + Send>, ImuError> {
    let writer: Box<dyn Write + Send> = match sink {
        OutputSink::Writer(w) => w,
        OutputSink::File(p) => Box::new(BufWriter::new(File::create(p)?)),
        OutputSink::Stdout => Box::new(BufWriter::new(io::stdout())),
    };
    Ok(writer)
}
