//! Utility functions for formatting and durable file operations.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Formats a duration as HH:MM:SS (e.g., 3725s -> "01:02:05").
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{secs:02}")
}

/// Formats bytes with appropriate binary units (B, KiB, MiB, GiB).
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;
    const GIB: f64 = MIB * 1024.0;

    let bytes_f64 = bytes as f64;
    if bytes_f64 >= GIB {
        format!("{:.2} GiB", bytes_f64 / GIB)
    } else if bytes_f64 >= MIB {
        format!("{:.2} MiB", bytes_f64 / MIB)
    } else if bytes_f64 >= KIB {
        format!("{:.2} KiB", bytes_f64 / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Safely extracts the filename from a path with consistent error handling.
pub fn get_filename_safe(path: &Path) -> CoreResult<String> {
    Ok(path
        .file_name()
        .ok_or_else(|| {
            CoreError::PathError(format!("Failed to get filename for {}", path.display()))
        })?
        .to_string_lossy()
        .to_string())
}

/// Copies `source` to `destination` and fsyncs the destination file.
///
/// Used for retention copies and staged output: the copy only counts as
/// confirmed once the data has reached the disk, not just the page cache.
pub fn copy_and_sync(source: &Path, destination: &Path) -> CoreResult<u64> {
    let bytes = std::fs::copy(source, destination)?;
    File::open(destination)?.sync_all()?;
    Ok(bytes)
}

/// Size of the file at `path` in bytes.
pub fn get_file_size(path: &Path) -> CoreResult<u64> {
    Ok(std::fs::metadata(path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_duration(Duration::from_secs(59)), "00:00:59");
        assert_eq!(format_duration(Duration::from_secs(60)), "00:01:00");
        assert_eq!(format_duration(Duration::from_secs(3661)), "01:01:01");
        assert_eq!(format_duration(Duration::from_secs(90061)), "25:01:01");
        // Fractional seconds truncate.
        assert_eq!(format_duration(Duration::from_millis(59_900)), "00:00:59");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1024), "1.00 KiB");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MiB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GiB");
    }

    #[test]
    fn test_get_filename_safe() {
        assert_eq!(
            get_filename_safe(Path::new("/path/to/file.tseq")).unwrap(),
            "file.tseq"
        );
        assert!(get_filename_safe(Path::new("/")).is_err());
    }

    #[test]
    fn copy_and_sync_copies_contents() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("a.bin");
        let destination = dir.path().join("b.bin");
        std::fs::write(&source, b"recording").unwrap();

        let bytes = copy_and_sync(&source, &destination).unwrap();
        assert_eq!(bytes, 9);
        assert_eq!(std::fs::read(&destination).unwrap(), b"recording");
    }
}
