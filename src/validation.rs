//! Pre-flight checks on a source directory.
//!
//! Checks run in a fixed order and stop at the first failing category:
//! existence, directory type, non-emptiness, then the zero-byte scan.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::ValidationError;

/// A regular file found below the source directory.
struct SourceFile {
    path: PathBuf,
    size: u64,
}

/// Validates `source_dir` before archiving.
///
/// # Errors
///
/// Returns the first [`ValidationError`] encountered.
pub fn validate(source_dir: &Path) -> Result<(), ValidationError> {
    if !source_dir.exists() {
        return Err(ValidationError::NotFound(source_dir.to_path_buf()));
    }
    if !source_dir.is_dir() {
        return Err(ValidationError::NotADirectory(source_dir.to_path_buf()));
    }

    let files = regular_files(source_dir)?;
    if files.is_empty() {
        return Err(ValidationError::Empty(source_dir.to_path_buf()));
    }

    let zero_byte: Vec<PathBuf> = files.into_iter().filter(|f| f.size == 0).map(|f| f.path).collect();
    if !zero_byte.is_empty() {
        return Err(ValidationError::ZeroByteFiles { files: zero_byte });
    }

    debug!(path = %source_dir.display(), "source directory passed validation");
    Ok(())
}

/// Collects every regular file below `root`, in file-name order.
///
/// Symlinks count when they resolve to a regular file. Dangling links are
/// skipped and linked directories are not descended.
fn regular_files(root: &Path) -> Result<Vec<SourceFile>, ValidationError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ValidationError::Unreadable { path: source.path().unwrap_or(root).to_path_buf(), source })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let Ok(meta) = fs::metadata(entry.path()) else {
            continue;
        };
        if meta.is_file() {
            files.push(SourceFile { path: entry.into_path(), size: meta.len() });
        }
    }

    Ok(files)
}
