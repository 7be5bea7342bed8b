//! Archive creation for TAR, ISO and DMG formats.
//!
//! TAR archives are written in-process with the `tar` crate. ISO and DMG
//! images are delegated to `xorriso` and `hdiutil` through a [`ToolRunner`].
//! Every format produces exactly one file named after the source directory.
//! A failed run may leave a partial archive behind; it is not cleaned up.

mod dmg;
mod iso;
mod tarball;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::PackagerError;
use crate::tool::ToolRunner;
use crate::types::ArchiveFormat;

/// Creates an archive of `source_dir` inside `output_dir`.
///
/// `output_dir` is created (with parents) when missing.
///
/// # Errors
///
/// Returns [`PackagerError`] when the output directory cannot be created, the
/// archive name cannot be derived, or the format's tool is missing or fails.
pub async fn create_archive<R: ToolRunner + ?Sized>(runner: &R, source_dir: &Path, output_dir: &Path, format: ArchiveFormat) -> Result<PathBuf, PackagerError> {
    fs::create_dir_all(output_dir).map_err(|source| PackagerError::Io { path: output_dir.to_path_buf(), source })?;

    let name = archive_name(source_dir)?;
    let archive_path = output_dir.join(format!("{name}.{}", format.extension()));

    info!(source = %source_dir.display(), archive = %archive_path.display(), %format, "creating archive");

    match format {
        ArchiveFormat::Tar => tarball::create(source_dir, &archive_path, &name).await?,
        ArchiveFormat::Iso => iso::create(runner, source_dir, &archive_path, &name).await?,
        ArchiveFormat::Dmg => dmg::create(runner, source_dir, &archive_path, &name).await?,
    }

    Ok(archive_path)
}

/// Final path component of `source_dir`, resolving paths such as `.` first.
fn archive_name(source_dir: &Path) -> Result<String, PackagerError> {
    if let Some(name) = source_dir.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }

    fs::canonicalize(source_dir)
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .ok_or_else(|| PackagerError::NoArchiveName(source_dir.to_path_buf()))
}

/// Runs a located tool and maps a non-zero exit to [`PackagerError::ToolFailed`].
async fn run_tool<R: ToolRunner + ?Sized>(runner: &R, tool: &'static str, hint: &'static str, args: Vec<OsString>) -> Result<(), PackagerError> {
    let binary = runner.locate(tool).ok_or(PackagerError::ToolMissing { tool, hint })?;

    let output = runner.run(&binary, &args).await.map_err(|source| PackagerError::Spawn { tool, source })?;
    if !output.success() {
        return Err(PackagerError::ToolFailed { tool, code: output.code, stdout: output.stdout, stderr: output.stderr });
    }
    Ok(())
}
