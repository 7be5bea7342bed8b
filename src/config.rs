//! Global Configuration Constants
//!
//! Fixed names, file locations and limits used throughout LAM. Values that a
//! user may change at runtime live in the settings store (see [`crate::settings`]);
//! everything here is compiled in.
//!
//! ## Layout
//!
//! - Application identity and the on-disk location of the settings file
//! - Compiled-in defaults for the `pack` command
//! - Names of the external tools LAM delegates to
//! - Presentation limits shared by validation and packaging

/// Application name used in user interfaces.
pub const APP_NAME: &str = "LAM";

/// Directory (below `~/.config`) that holds the settings file.
pub const CONFIG_DIR_NAME: &str = "langzeitarchiv-manager";

/// File name of the persisted settings document.
pub const CONFIG_FILE_NAME: &str = "config.toml";

// === Pack Defaults ===
// Used when neither a command-line flag nor a persisted override is present.

/// Default PAR2 redundancy in percent of the archive size.
///
/// 15% recovers from moderate bit rot while keeping the sidecar files
/// reasonably small compared to the archive.
pub const DEFAULT_REDUNDANCY_PERCENT: i64 = 15;

/// Default number of PAR2 recovery volume files.
///
/// A single volume keeps all recovery data in one file next to the archive.
pub const DEFAULT_PAR2_VOLUMES: i64 = 1;

/// Default archive format name.
pub const DEFAULT_FORMAT: &str = "tar";

/// Staging directory for archives, relative to the user's home directory.
pub const DEFAULT_OUTPUT_SUBDIR: &[&str] = &["LAM", "staging"];

// === External Tools ===

/// ISO mastering tool.
pub const XORRISO: &str = "xorriso";

/// macOS disk image tool.
pub const HDIUTIL: &str = "hdiutil";

/// Binary names under which par2cmdline may be installed, in lookup order.
pub const PAR2_BINARIES: &[&str] = &["par2", "par2create"];

/// Extension of PAR2 sidecar files.
pub const PAR2_EXTENSION: &str = ".par2";

// === Limits ===

/// Maximum length of an ISO volume label in characters.
pub const ISO_LABEL_MAX_CHARS: usize = 32;

/// Maximum number of zero-byte files named in a validation error.
///
/// Further offenders are summarised as a count.
pub const ZERO_BYTE_LISTING_LIMIT: usize = 5;
