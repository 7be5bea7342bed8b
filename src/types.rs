//! Common type definitions for LAM.
//!
//! - [`ArchiveFormat`]: container formats the packager can produce
//! - [`ProducedFile`]: a file written by a pack run, with its size for reporting

use std::path::{Path, PathBuf};
use std::str::FromStr;

use strum::{Display, EnumString, IntoStaticStr};

use crate::error::PackagerError;

/// Container format of the produced archive.
///
/// The lower-case variant name doubles as the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum ArchiveFormat {
    /// Uncompressed tar written in-process.
    Tar,

    /// ISO9660 + UDF image with Rock Ridge extensions, via xorriso.
    Iso,

    /// Read-only uncompressed macOS disk image, via hdiutil.
    Dmg,
}

impl ArchiveFormat {
    /// File extension (without the dot) of archives in this format.
    #[inline]
    pub fn extension(self) -> &'static str {
        self.into()
    }

    /// Parses a user-supplied format name.
    ///
    /// # Errors
    ///
    /// Returns [`PackagerError::UnknownFormat`] naming the rejected input.
    pub fn parse(name: &str) -> Result<Self, PackagerError> {
        Self::from_str(name).map_err(|_| PackagerError::UnknownFormat(name.to_owned()))
    }

    /// Label used in progress output, e.g. `TAR`.
    #[inline]
    pub fn label(self) -> String {
        self.extension().to_ascii_uppercase()
    }
}

/// A file written by a pack run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducedFile {
    pub path: PathBuf,
    pub size: u64,
}

impl ProducedFile {
    /// Stats `path` and records its current size.
    pub fn stat(path: &Path) -> std::io::Result<Self> {
        let size = std::fs::metadata(path)?.len();
        Ok(Self { path: path.to_path_buf(), size })
    }

    /// File name for display, falling back to the full path.
    pub fn name(&self) -> String {
        self.path.file_name().map_or_else(|| self.path.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}
