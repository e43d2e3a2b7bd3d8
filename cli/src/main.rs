//! imu-export
//!
//! Decodes raw IMU recordings and writes one row per motion sample.

mod args;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use imu_core::batch::{decode_batch, merged_counters, RecordingJob};
use imu_core::export::{export_samples, sink_for, ExportFormat};
use imu_core::io::{load_raw_buffer, open_output, InputSource, OutputSink};
use imu_core::stream::{DecodeConfig, DecodeSequence};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Logs go to stderr so CSV on stdout stays clean.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.decode_config();
    config.validate()?;
    let format = ExportFormat::from(cli.format);

    if cli.inputs.len() == 1 {
        run_single(&cli.inputs[0], cli.output.as_deref(), format, config, cli.stats)
    } else {
        run_batch(&cli.inputs, cli.output.as_deref(), format, &config, cli.workers, cli.stats)
    }
}

fn run_single(
    input: &Path,
    output: Option<&Path>,
    format: ExportFormat,
    config: DecodeConfig,
    stats: bool,
) -> Result<()> {
    let buffer = load_raw_buffer(InputSource::File(input.to_path_buf()))
        .with_context(|| format!("reading {}", input.display()))?;

    let sink = match output {
        Some(p) => OutputSink::File(p.to_path_buf()),
        None => OutputSink::Stdout,
    };
    let mut sink = sink_for(format, open_output(sink)?);

    let mut seq = DecodeSequence::new(&buffer, config);
    let result = export_samples(&mut seq, sink.as_mut());

    for skipped in seq.skipped() {
        warn!(
            packet = skipped.failure.packet_index,
            offset = skipped.failure.offset,
            preview = %skipped.payload_preview,
            "skipped packet"
        );
    }
    if stats {
        eprintln!("{}", seq.snapshot().to_json()?);
    }

    let rows = result.with_context(|| format!("decoding {}", input.display()))?;
    info!(input = %input.display(), rows, "export finished");
    Ok(())
}

fn run_batch(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    format: ExportFormat,
    config: &DecodeConfig,
    workers: Option<usize>,
    stats: bool,
) -> Result<()> {
    if let Some(dir) = output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
    }

    let mut jobs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let buffer = load_raw_buffer(InputSource::File(input.clone()))
            .with_context(|| format!("reading {}", input.display()))?;
        jobs.push(RecordingJob::new(input.display().to_string(), buffer));
    }

    let outcomes = decode_batch(jobs, config, workers)?;
    let mut failed = 0usize;

    for (input, outcome) in inputs.iter().zip(&outcomes) {
        let recording = match &outcome.result {
            Ok(rec) => rec,
            Err(e) => {
                error!(input = %outcome.name, error = %e, "decode failed");
                failed += 1;
                continue;
            }
        };

        let target = output_path(input, output_dir, format);
        let mut sink = sink_for(format, open_output(OutputSink::File(target.clone()))?);
        for sample in &recording.samples {
            sink.write_sample(sample)?;
        }
        sink.finish()?;

        info!(
            input = %outcome.name,
            output = %target.display(),
            rows = recording.samples.len(),
            skipped = recording.skipped.len(),
            "export finished"
        );
    }

    if stats {
        eprintln!("{}", serde_json::to_string_pretty(&merged_counters(&outcomes))?);
    }

    if failed > 0 {
        bail!("{failed} of {} recordings failed to decode", outcomes.len());
    }
    Ok(())
}

/// `<dir>/<stem>.<ext>`, where `dir` defaults to the input's directory.
fn output_path(input: &Path, output_dir: Option<&Path>, format: ExportFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "imu".to_string());
    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(format!("{stem}.{}", format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_defaults_next_to_input() {
        let p = output_path(Path::new("/data/rec/extimu ps1.raw"), None, ExportFormat::Csv);
        assert_eq!(p, PathBuf::from("/data/rec/extimu ps1.csv"));
    }

    #[test]
    fn output_path_uses_output_dir() {
        let p = output_path(Path::new("/data/rec/a.raw"), Some(Path::new("/out")), ExportFormat::JsonLines);
        assert_eq!(p, PathBuf::from("/out/a.jsonl"));
    }
}
