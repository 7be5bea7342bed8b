//! PAR2 recovery data via par2cmdline.
//!
//! The recovery files are written next to the archive. Their number and names
//! are decided by par2; LAM only discovers them afterwards by matching
//! `<archive-stem>*.par2` in the archive's directory.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::{PAR2_BINARIES, PAR2_EXTENSION};
use crate::error::Par2Error;
use crate::tool::ToolRunner;

/// Creates PAR2 sidecar files for `archive_path`.
///
/// `redundancy_percent` is passed as `-r`, `volumes` as `-n`. Returns the
/// generated `.par2` files in lexical order.
///
/// # Errors
///
/// Returns [`Par2Error`] when neither `par2` nor `par2create` is installed, the
/// tool exits non-zero, or no recovery files can be found afterwards.
pub async fn create<R: ToolRunner + ?Sized>(runner: &R, archive_path: &Path, redundancy_percent: u32, volumes: u32) -> Result<Vec<PathBuf>, Par2Error> {
    let binary = PAR2_BINARIES.iter().find_map(|name| runner.locate(name)).ok_or(Par2Error::ToolMissing)?;

    // Only the final extension is stripped: "photos.2025.tar" -> "photos.2025".
    let base_name = archive_path.file_stem().ok_or_else(|| Par2Error::NoArchiveName(archive_path.to_path_buf()))?;
    let directory = archive_path.parent().unwrap_or_else(|| Path::new(""));
    let par2_base = directory.join(base_name);

    let args: Vec<OsString> = vec!["create".into(), format!("-r{redundancy_percent}").into(), format!("-n{volumes}").into(), par2_base.into(), archive_path.into()];

    info!(archive = %archive_path.display(), redundancy_percent, volumes, "creating PAR2 recovery data");

    let output = runner.run(&binary, &args).await.map_err(Par2Error::Spawn)?;
    if !output.success() {
        return Err(Par2Error::ToolFailed { code: output.code, stdout: output.stdout, stderr: output.stderr });
    }

    let files = discover(directory, &base_name.to_string_lossy())?;
    if files.is_empty() {
        return Err(Par2Error::NoRecoveryFiles(archive_path.to_path_buf()));
    }

    debug!(count = files.len(), "PAR2 files discovered");
    Ok(files)
}

/// Lists files in `directory` named `<base_name>*.par2`, sorted.
fn discover(directory: &Path, base_name: &str) -> Result<Vec<PathBuf>, Par2Error> {
    let listing = if directory.as_os_str().is_empty() { Path::new(".") } else { directory };
    let entries = fs::read_dir(listing).map_err(|source| Par2Error::Io { path: listing.to_path_buf(), source })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with(base_name) && name.ends_with(PAR2_EXTENSION) && entry.path().is_file()
        })
        .map(|entry| directory.join(entry.file_name()))
        .collect();

    files.sort();
    Ok(files)
}
