//! Command-Line Interface

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use imu_core::export::ExportFormat;
use imu_core::stream::{DecodeConfig, DecodeMode};

/// Decode raw IMU recordings into CSV or JSON lines
#[derive(Parser, Debug)]
#[command(name = "imu-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Raw IMU recording file(s)
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file for a single input, output directory for several.
    /// Defaults to stdout (single input) or the input's directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Csv)]
    pub format: Format,

    /// Skip malformed packets instead of aborting
    #[arg(long)]
    pub lenient: bool,

    /// Abort once more than N packets were skipped
    #[arg(long, value_name = "N", requires = "lenient")]
    pub max_skipped: Option<usize>,

    /// Worker threads for several inputs (default: one per core)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Print decode statistics as JSON on stderr
    #[arg(long)]
    pub stats: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Jsonl,
}

impl From<Format> for ExportFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Csv => ExportFormat::Csv,
            Format::Jsonl => ExportFormat::JsonLines,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn decode_config(&self) -> DecodeConfig {
        let mode = if self.lenient { DecodeMode::Lenient } else { DecodeMode::Strict };
        DecodeConfig::new(Some(mode), self.max_skipped)
    }
}
