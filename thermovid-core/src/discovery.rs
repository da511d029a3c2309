//! File discovery module for finding recordings to convert.
//!
//! Scans the top level of the provided directory for .tseq recordings
//! (case-insensitive). Subdirectories are not searched; recorders drop
//! their files flat into the upload folder.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Finds .tseq recordings eligible for conversion in the given directory.
///
/// Returns the discovered paths sorted by file name so batches process in a
/// stable order, or [`CoreError::NoFilesFound`] when the directory contains
/// no recordings.
pub fn find_processable_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();

            if !path.is_file() {
                return None;
            }

            path.extension()
                .and_then(|ext| ext.to_str())
                .filter(|ext_str| ext_str.eq_ignore_ascii_case("tseq"))
                .map(|_| path.clone())
        })
        .collect();

    if files.is_empty() {
        Err(CoreError::NoFilesFound)
    } else {
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tseq_files_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.tseq"), b"x").unwrap();
        std::fs::write(dir.path().join("a.TSEQ"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("nested.tseq")).unwrap();

        let files = find_processable_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.TSEQ", "b.tseq"]);
    }

    #[test]
    fn empty_directory_is_no_files_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_processable_files(dir.path()),
            Err(CoreError::NoFilesFound)
        ));
    }

    #[test]
    fn missing_directory_is_io_error() {
        assert!(matches!(
            find_processable_files(Path::new("surely/this/does/not/exist")),
            Err(CoreError::Io(_))
        ));
    }
}
