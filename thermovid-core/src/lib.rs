//! Core library for converting thermal frame-sequence recordings into
//! color-mapped MP4 video using ffmpeg.
//!
//! This crate provides recording discovery, the adaptive auto-exposure
//! controller, temperature-to-color mapping, the per-sequence frame
//! pipeline, and the batch conversion driver.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//!
//! use thermovid_core::{Colormap, CoreConfig, process_recordings};
//! use thermovid_core::sink::FfmpegSinkFactory;
//! use thermovid_core::status::NullIndicator;
//!
//! let config = CoreConfig::new(
//!     PathBuf::from("/path/to/recordings"),
//!     PathBuf::from("/path/to/videos"),
//! );
//! config.validate().unwrap();
//!
//! let files = thermovid_core::find_processable_files(&config.input_dir).unwrap();
//! let summary = process_recordings(
//!     &FfmpegSinkFactory,
//!     &NullIndicator,
//!     &config,
//!     &files,
//!     Colormap::built_in(),
//! ).unwrap();
//! println!("converted {} recording(s)", summary.results.len());
//! ```

pub mod colormap;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exposure;
pub mod pipeline;
pub mod processing;
pub mod render;
pub mod sink;
pub mod source;
pub mod status;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use colormap::Colormap;
pub use config::CoreConfig;
pub use discovery::find_processable_files;
pub use error::{CoreError, CoreResult};
pub use exposure::ExposureWindow;
pub use pipeline::convert_sequence;
pub use processing::{ConvertResult, ProcessingSummary, process_recordings};
pub use utils::{format_bytes, format_duration};
