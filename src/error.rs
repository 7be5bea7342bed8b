//! Error types for the pack pipeline and the settings store.
//!
//! Each stage has its own error enum so the CLI can report which step failed.
//! Errors raised by external tools carry the exit code and captured output.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ZERO_BYTE_LISTING_LIMIT;

/// Structural problems found in a source directory before packing.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Source directory does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Source path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Source directory is empty: {}", .0.display())]
    Empty(PathBuf),

    /// `files` holds every offending path; only the first few are rendered.
    #[error("Found 0-byte file(s): {}", zero_byte_listing(.files))]
    ZeroByteFiles { files: Vec<PathBuf> },

    #[error("Cannot read source entry {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Failures while creating the archive file.
#[derive(Debug, Error)]
pub enum PackagerError {
    #[error("Unknown format: '{0}'. Choose tar, iso, or dmg.")]
    UnknownFormat(String),

    #[error("Cannot derive an archive name from {}", .0.display())]
    NoArchiveName(PathBuf),

    #[error("{tool} not found. {hint}")]
    ToolMissing { tool: &'static str, hint: &'static str },

    #[error("{tool} exited with code {}.\nstdout: {stdout}\nstderr: {stderr}", exit_label(.code))]
    ToolFailed { tool: &'static str, code: Option<i32>, stdout: String, stderr: String },

    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures while generating PAR2 recovery data.
#[derive(Debug, Error)]
pub enum Par2Error {
    #[error("par2 / par2create not found. Install it first (e.g. `brew install par2` on macOS or `apt install par2` on Debian/Ubuntu).")]
    ToolMissing,

    #[error("par2 exited with code {}.\nstdout: {stdout}\nstderr: {stderr}", exit_label(.code))]
    ToolFailed { code: Option<i32>, stdout: String, stderr: String },

    #[error("failed to run par2: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Cannot derive a PAR2 base name from {}", .0.display())]
    NoArchiveName(PathBuf),

    #[error("par2 reported success but no recovery files were found for {}", .0.display())]
    NoRecoveryFiles(PathBuf),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures of the persisted settings store.
///
/// Reading never fails: a missing or unparsable file counts as "no overrides".
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("invalid config key: '{0}'")]
    InvalidKey(String),

    #[error("I/O error accessing config at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

fn zero_byte_listing(files: &[PathBuf]) -> String {
    let names = files.iter().take(ZERO_BYTE_LISTING_LIMIT).map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ");

    match files.len().saturating_sub(ZERO_BYTE_LISTING_LIMIT) {
        0 => names,
        extra => format!("{names} (and {extra} more)"),
    }
}

fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none (terminated by signal)".to_owned(), |c| c.to_string())
}
