//! Temporary file management utilities.
//!
//! This module provides helper functions for staging encoder output before
//! it is moved into place. It leverages the tempfile crate to handle
//! automatic cleanup via the Drop trait, ensuring proper cleanup even in
//! error cases.

use std::path::{Path, PathBuf};

use tempfile::{Builder as TempFileBuilder, TempDir};

use crate::error::CoreResult;

/// Creates a temporary directory with prefix inside `base_dir`. Auto-cleaned
/// when dropped.
pub fn create_temp_dir(base_dir: &Path, prefix: &str) -> CoreResult<TempDir> {
    std::fs::create_dir_all(base_dir)?;

    Ok(TempFileBuilder::new()
        .prefix(prefix)
        .tempdir_in(base_dir)?)
}

/// Returns a temporary file path with random suffix. Does not create the file.
pub fn create_temp_file_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    use rand::distributions::Alphanumeric;
    use rand::{Rng, thread_rng};

    let random_suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    let filename = format!("{prefix}_{random_suffix}.{extension}");
    dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_is_removed_on_drop() {
        let base = tempfile::tempdir().unwrap();
        let path = {
            let staged = create_temp_dir(base.path(), "thermovid_stage").unwrap();
            assert!(staged.path().is_dir());
            staged.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[test]
    fn temp_file_paths_are_unique() {
        let dir = PathBuf::from("/tmp");
        let a = create_temp_file_path(&dir, "encode", "mp4");
        let b = create_temp_file_path(&dir, "encode", "mp4");
        assert_ne!(a, b);
        assert!(a.to_string_lossy().ends_with(".mp4"));
    }
}
