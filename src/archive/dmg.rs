//! Read-only, uncompressed macOS disk images created by `hdiutil`.

use std::ffi::OsString;
use std::path::Path;

use crate::config::HDIUTIL;
use crate::error::PackagerError;
use crate::tool::ToolRunner;

const INSTALL_HINT: &str = "hdiutil is a macOS built-in tool and is not available on this system.";

/// `UDRO`: read-only image without compression. `-ov` overwrites an existing image.
pub(super) async fn create<R: ToolRunner + ?Sized>(runner: &R, source_dir: &Path, archive_path: &Path, name: &str) -> Result<(), PackagerError> {
    let args: Vec<OsString> = vec!["create".into(), "-volname".into(), name.into(), "-srcfolder".into(), source_dir.into(), "-ov".into(), "-format".into(), "UDRO".into(), archive_path.into()];

    super::run_tool(runner, HDIUTIL, INSTALL_HINT, args).await
}
