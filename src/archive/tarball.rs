//! Uncompressed TAR archives written in-process.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tar::Builder;
use tracing::debug;

use crate::error::PackagerError;

/// Writes `source_dir` recursively into `archive_path`, rooted at `name/`.
///
/// The directory walk runs on the blocking pool; the caller awaits it before
/// moving on. Symlinks are stored as links, not followed.
pub(super) async fn create(source_dir: &Path, archive_path: &Path, name: &str) -> Result<(), PackagerError> {
    let (source, target, root) = (source_dir.to_path_buf(), archive_path.to_path_buf(), name.to_owned());

    tokio::task::spawn_blocking(move || write_tar(&source, &target, &root))
        .await
        .map_err(|e| PackagerError::Io { path: archive_path.to_path_buf(), source: std::io::Error::other(e) })?
}

fn write_tar(source_dir: &Path, archive_path: &Path, name: &str) -> Result<(), PackagerError> {
    let io_err = |source| PackagerError::Io { path: archive_path.to_path_buf(), source };

    let file = File::create(archive_path).map_err(io_err)?;
    let mut builder = Builder::new(BufWriter::new(file));
    builder.follow_symlinks(false);

    builder.append_dir_all(name, source_dir).map_err(io_err)?;
    let mut writer = builder.into_inner().map_err(io_err)?;
    std::io::Write::flush(&mut writer).map_err(io_err)?;

    debug!(archive = %archive_path.display(), "tar archive written");
    Ok(())
}
