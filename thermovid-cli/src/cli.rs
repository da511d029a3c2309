// thermovid-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Thermovid: Thermal recording conversion tool",
    long_about = "Converts .tseq thermal recordings into color-mapped MP4 video \
                  using ffmpeg via the thermovid-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts every .tseq recording in a folder to MP4
    Convert(ConvertArgs),
    // Add other subcommands here later (e.g., inspect)
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Folder with .tseq recordings to convert
    #[arg(required = true, value_name = "SOURCE_FOLDER")]
    pub source_folder: PathBuf,

    /// Where to save converted MP4 files (defaults to SOURCE_FOLDER/videos)
    #[arg(short = 'o', long = "output-folder", value_name = "OUTPUT_DIR")]
    pub output_folder: Option<PathBuf>,

    /// Colormap table (JSON) to use instead of the built-in ironbow palette
    #[arg(short = 'c', long = "colormap", value_name = "COLORMAP_FILE")]
    pub colormap: Option<PathBuf>,

    /// Blink the Raspberry Pi green LED while converting, solid when done
    #[arg(short = 'b', long = "blink")]
    pub blink: bool,

    /// Copy each original recording next to its converted output
    #[arg(long)]
    pub copy_original: bool,

    /// Delete each original after its retention copy is confirmed
    /// (requires --copy-original)
    #[arg(long)]
    pub delete_original: bool,

    /// Optional: Directory for log files (defaults to OUTPUT_DIR/logs)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}
