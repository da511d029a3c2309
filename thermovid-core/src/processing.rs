// ============================================================================
// thermovid-core/src/processing.rs
// ============================================================================
//
// CONVERSION DRIVER: Main Batch Orchestration
//
// This module houses the batch orchestration logic for the thermovid-core
// library. It coordinates the conversion workflow for every discovered
// recording: resolving the output name from sequence metadata, running the
// frame pipeline into a staged encoder output, durably moving the result
// into place, and applying the retention policy for the original file.
//
// WORKFLOW, per recording:
// 1. Open the recording and read its metadata
// 2. Derive <device>/<device>_<timestamp>.mp4 (fallback label when the
//    recorder wrote no device name) and skip if the output already exists
// 3. Encode into a staging file, then copy+fsync+rename into place
// 4. Optionally retain a copy of the original (copy+fsync); optionally
//    delete the original once the copy is confirmed
//
// A single recording's failure is logged and skipped; the batch continues
// with the remaining files.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{error, info, warn};

use crate::colormap::Colormap;
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::pipeline::convert_sequence;
use crate::render::scaled_dimensions;
use crate::sink::SinkFactory;
use crate::source::{FrameSource, SequenceInfo, TseqReader};
use crate::status::StatusIndicator;
use crate::temp_files;
use crate::utils::{copy_and_sync, format_bytes, format_duration, get_file_size, get_filename_safe};

/// Directory and filename label used when a recording carries no device name.
pub const NO_DEVICE_LABEL: &str = "NO_DEVICE_NAME";

/// Result of one successful conversion.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    pub filename: String,
    pub output_path: PathBuf,
    pub frames: u64,
    pub duration: Duration,
    pub input_size: u64,
    pub output_size: u64,
}

/// Outcome of a whole conversion run.
#[derive(Debug, Clone, Default)]
pub struct ProcessingSummary {
    /// Successfully converted recordings, in processing order.
    pub results: Vec<ConvertResult>,

    /// Recordings skipped because their output already existed.
    pub skipped: usize,

    /// Recordings that failed to convert.
    pub failures: usize,
}

/// Converts a batch of recordings according to the provided configuration.
///
/// This is the main entry point of the library. Errors local to one
/// recording are reported and skipped so a single bad file cannot block the
/// rest of the batch; only setup errors (e.g. an unwritable output
/// directory) abort the run.
pub fn process_recordings<F: SinkFactory, I: StatusIndicator>(
    sink_factory: &F,
    indicator: &I,
    config: &CoreConfig,
    files: &[PathBuf],
    colormap: &Colormap,
) -> CoreResult<ProcessingSummary> {
    std::fs::create_dir_all(&config.output_dir)?;
    let staging_dir = temp_files::create_temp_dir(&config.output_dir, ".thermovid_staging")?;

    info!(
        "Converting {} recording(s) with colormap '{}'",
        files.len(),
        colormap.name()
    );
    indicator.converting();

    let mut summary = ProcessingSummary::default();

    for input_path in files {
        let file_start_time = Instant::now();
        let filename = match get_filename_safe(input_path) {
            Ok(name) => name,
            Err(e) => {
                error!("Skipping recording with unusable path: {e}");
                summary.failures += 1;
                continue;
            }
        };

        info!("Processing: {filename}");

        match convert_one(
            sink_factory,
            config,
            input_path,
            staging_dir.path(),
            colormap,
        ) {
            Ok(Some((output_path, frames))) => {
                let duration = file_start_time.elapsed();
                let input_size = get_file_size(input_path).unwrap_or(0);
                let output_size = get_file_size(&output_path).unwrap_or(0);
                info!(
                    "Completed: {} -> {} ({} frames, {} -> {}, {})",
                    filename,
                    output_path.display(),
                    frames,
                    format_bytes(input_size),
                    format_bytes(output_size),
                    format_duration(duration)
                );

                apply_retention_policy(config, input_path, &output_path, &filename);

                summary.results.push(ConvertResult {
                    filename,
                    output_path,
                    frames,
                    duration,
                    input_size,
                    output_size,
                });
            }
            Ok(None) => {
                summary.skipped += 1;
            }
            Err(e) => {
                error!("Failed to convert {filename}: {e}");
                summary.failures += 1;
            }
        }
        info!("----------------------------------------");
    }

    indicator.done();
    Ok(summary)
}

/// Converts one recording. Returns `Ok(None)` when the output already
/// exists and the file is skipped.
fn convert_one<F: SinkFactory>(
    sink_factory: &F,
    config: &CoreConfig,
    input_path: &Path,
    staging_dir: &Path,
    colormap: &Colormap,
) -> CoreResult<Option<(PathBuf, u64)>> {
    let mut reader = TseqReader::open(input_path)?;
    let info = reader.info().clone();

    let (device_label, output_name) = output_name_for(&info);
    let device_dir = config.output_dir.join(&device_label);
    std::fs::create_dir_all(&device_dir)?;
    let final_path = device_dir.join(&output_name);

    if final_path.exists() {
        warn!(
            "Output file already exists: {}. Skipping conversion.",
            final_path.display()
        );
        return Ok(None);
    }

    // Encode into the staging area first; the destination only ever sees a
    // fully finalized file.
    let staged_path = temp_files::create_temp_file_path(staging_dir, "encode", "mp4");
    let (out_width, out_height) = scaled_dimensions(info.width, info.height);
    let mut sink = sink_factory.open(&staged_path, out_width, out_height, info.frame_rate)?;
    let stats = convert_sequence(&mut reader, &mut sink, colormap)?;
    drop(sink);

    persist_output(&staged_path, &final_path)?;
    let _ = std::fs::remove_file(&staged_path);

    Ok(Some((final_path, stats.frames)))
}

/// Derives the device directory label and output file name from sequence
/// metadata. The device name prefixes the file name when present; otherwise
/// the recording lands under the fallback label with a bare timestamp name.
fn output_name_for(info: &SequenceInfo) -> (String, String) {
    let timestamp = info.timestamp.format("%Y%m%d-%H%M%S");
    match info.device_name.as_deref() {
        Some(device) if !device.is_empty() => {
            // Device names become path components; keep them flat.
            let device: String = device
                .chars()
                .map(|c| if std::path::is_separator(c) { '-' } else { c })
                .collect();
            let name = format!("{device}_{timestamp}.mp4");
            (device, name)
        }
        _ => (NO_DEVICE_LABEL.to_string(), format!("{timestamp}.mp4")),
    }
}

/// Moves a finalized staged encode into place: copy to a partial file next
/// to the destination, fsync, then rename over the final name.
fn persist_output(staged_path: &Path, final_path: &Path) -> CoreResult<()> {
    let mut partial_name = final_path
        .file_name()
        .ok_or_else(|| {
            CoreError::PathError(format!("Invalid output path {}", final_path.display()))
        })?
        .to_os_string();
    partial_name.push(".part");
    let partial_path = final_path.with_file_name(partial_name);

    copy_and_sync(staged_path, &partial_path)?;
    std::fs::rename(&partial_path, final_path)?;
    Ok(())
}

/// Applies the retention policy after a successful conversion. Retention
/// failures are reported but never fail the conversion itself, and the
/// original is only deleted once its copy has been confirmed on disk.
fn apply_retention_policy(
    config: &CoreConfig,
    input_path: &Path,
    output_path: &Path,
    filename: &str,
) {
    if !config.copy_original {
        return;
    }

    let retained_path = match output_path.parent() {
        Some(parent) => parent.join(filename),
        None => {
            error!("Cannot determine retention directory for {filename}");
            return;
        }
    };

    match copy_and_sync(input_path, &retained_path) {
        Ok(bytes) => {
            info!(
                "Retained original {} ({})",
                retained_path.display(),
                format_bytes(bytes)
            );
            if config.delete_original {
                match std::fs::remove_file(input_path) {
                    Ok(()) => info!("Deleted original {}", input_path.display()),
                    Err(e) => warn!("Failed to delete original {filename}: {e}"),
                }
            }
        }
        Err(e) => {
            // Never delete the source on an unconfirmed copy.
            let e = CoreError::RetentionCopy(format!("{filename}: {e}"));
            error!("{e}");
        }
    }
}
