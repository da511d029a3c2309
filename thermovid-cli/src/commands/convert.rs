// ============================================================================
// thermovid-cli/src/commands/convert.rs
// ============================================================================
//
// CONVERT COMMAND: Batch Conversion Entry Point
//
// Validates paths, sets up logging, loads the colormap, discovers the
// recordings to process, and invokes thermovid_core::process_recordings.
// Finishes by printing a run summary and reporting whether every discovered
// recording converted successfully.

use std::fs;
use std::time::Instant;

use console::style;
use log::info;
use thermovid_core::sink::FfmpegSinkFactory;
use thermovid_core::status::{LedIndicator, NullIndicator, StatusIndicator};
use thermovid_core::{
    Colormap, CoreConfig, CoreError, CoreResult, format_bytes, format_duration,
    process_recordings,
};

use crate::cli::ConvertArgs;
use crate::logging::{get_timestamp, setup_logging};

/// Runs the convert command. Returns `Ok(true)` when every discovered
/// recording converted, `Ok(false)` when some failed.
pub fn run_convert(args: ConvertArgs) -> CoreResult<bool> {
    let total_start_time = Instant::now();

    // --- Determine Paths ---
    let source_folder = args.source_folder.canonicalize().map_err(|e| {
        CoreError::PathError(format!(
            "input path '{}': {}",
            args.source_folder.display(),
            e
        ))
    })?;
    if !source_folder.is_dir() {
        return Err(CoreError::PathError(format!(
            "input path '{}' is not a directory",
            source_folder.display()
        )));
    }
    let output_dir = args
        .output_folder
        .unwrap_or_else(|| source_folder.join("videos"));
    let log_dir = args.log_dir.unwrap_or_else(|| output_dir.join("logs"));

    // --- Create Output/Log Dirs and Set Up Logging ---
    fs::create_dir_all(&output_dir)?;
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join(format!("thermovid_convert_{}.log", get_timestamp()));
    setup_logging(args.verbose, &log_path)
        .map_err(|e| CoreError::Other(format!("failed to set up logging: {e}")))?;

    // --- Load the Colormap (fatal before any conversion is attempted) ---
    let loaded_colormap;
    let colormap = match &args.colormap {
        Some(path) => {
            loaded_colormap = Colormap::from_path(path)?;
            &loaded_colormap
        }
        None => Colormap::built_in(),
    };
    info!("Using colormap '{}'", colormap.name());

    // --- Build and Validate Configuration ---
    let mut config = CoreConfig::new(source_folder.clone(), output_dir);
    config.colormap_path = args.colormap.clone();
    config.copy_original = args.copy_original;
    config.delete_original = args.delete_original;
    config.validate()?;

    // --- Discover Recordings ---
    let files = match thermovid_core::find_processable_files(&source_folder) {
        Ok(files) => files,
        Err(CoreError::NoFilesFound) => {
            println!(
                "No recordings found in {}",
                style(source_folder.display()).yellow()
            );
            return Ok(true);
        }
        Err(e) => return Err(e),
    };

    // --- Convert ---
    let indicator: Box<dyn StatusIndicator> = if args.blink {
        Box::new(LedIndicator::green_led())
    } else {
        Box::new(NullIndicator)
    };
    let summary = process_recordings(&FfmpegSinkFactory, &indicator, &config, &files, colormap)?;

    // --- Summary ---
    let total_frames: u64 = summary.results.iter().map(|r| r.frames).sum();
    let total_output: u64 = summary.results.iter().map(|r| r.output_size).sum();
    println!();
    println!(
        "{} {} converted, {} skipped, {} failed in {}",
        style("Done:").green().bold(),
        summary.results.len(),
        summary.skipped,
        style(summary.failures).red(),
        format_duration(total_start_time.elapsed())
    );
    if !summary.results.is_empty() {
        println!(
            "  {} frames encoded, {} written",
            total_frames,
            format_bytes(total_output)
        );
    }

    Ok(summary.failures == 0)
}
