// ============================================================================
// thermovid-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Core Configuration Structures and Constants
//
// This module defines the configuration structure and the fixed pipeline
// constants used throughout the thermovid-core library. Instances of
// CoreConfig are created by consumers of the library (like thermovid-cli)
// and passed to process_recordings to control conversion behavior.

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

// ============================================================================
// PIPELINE CONSTANTS
// ============================================================================

/// Linear upscale factor applied to every rendered frame before encoding.
pub const FRAME_SCALE: f32 = 4.0;

/// Exponential smoothing constant for the auto-exposure window. Values close
/// to 1.0 make the window react slowly to changes in the frame range.
pub const NORMALISATION_SMOOTH: f32 = 0.95;

/// Headroom added below the frame minimum and above the frame maximum before
/// smoothing, in the same units as the raw frame values. Biases the window
/// slightly wider than the raw extremes so smoothing does not clip.
pub const HEADROOM: f32 = 25.0;

/// Frame rate assumed for recordings whose header does not carry one.
pub const DEFAULT_FRAME_RATE: u32 = 9;

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Main configuration structure for the thermovid-core library.
///
/// Holds the paths and retention policy for a conversion run. Typically
/// created by the consumer of the library (e.g., thermovid-cli) and passed
/// to [`crate::processing::process_recordings`].
#[derive(Debug, Clone)]
pub struct CoreConfig {
    // ---- Path Configuration ----
    /// Directory containing input .tseq recordings to convert
    pub input_dir: PathBuf,

    /// Directory where converted MP4 files will be saved (one subdirectory
    /// per device)
    pub output_dir: PathBuf,

    /// Optional override for the colormap table file. When `None`, the
    /// built-in ironbow palette is used.
    pub colormap_path: Option<PathBuf>,

    // ---- Retention Options ----
    /// Whether to copy the original recording next to the converted output
    pub copy_original: bool,

    /// Whether to delete the original recording after its retention copy has
    /// been confirmed on disk. Requires `copy_original`.
    pub delete_original: bool,
}

impl CoreConfig {
    /// Creates a configuration with retention disabled.
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            colormap_path: None,
            copy_original: false,
            delete_original: false,
        }
    }

    /// Validates the configuration before a run.
    ///
    /// The input directory must exist, and deleting originals is only
    /// permitted when a retention copy is requested first. The source is
    /// never deleted on an unconfirmed copy.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.input_dir.is_dir() {
            return Err(CoreError::Config(format!(
                "Input directory '{}' does not exist or is not a directory",
                self.input_dir.display()
            )));
        }
        if self.delete_original && !self.copy_original {
            return Err(CoreError::Config(
                "delete_original requires copy_original: originals are only \
                 deleted after a confirmed retention copy"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_missing_input_dir() {
        let config = CoreConfig::new(
            PathBuf::from("surely/this/does/not/exist"),
            PathBuf::from("out"),
        );
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn validate_rejects_delete_without_copy() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CoreConfig::new(dir.path().to_path_buf(), PathBuf::from("out"));
        config.delete_original = true;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        config.copy_original = true;
        assert!(config.validate().is_ok());
    }
}
