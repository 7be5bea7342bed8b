//! ISO9660 + UDF images with Rock Ridge extensions, mastered by `xorriso`.

use std::ffi::OsString;
use std::path::Path;

use crate::config::{ISO_LABEL_MAX_CHARS, XORRISO};
use crate::error::PackagerError;
use crate::tool::ToolRunner;

const INSTALL_HINT: &str = "Install it first (e.g. `brew install xorriso` on macOS or `apt install xorriso` on Debian/Ubuntu).";

pub(super) async fn create<R: ToolRunner + ?Sized>(runner: &R, source_dir: &Path, archive_path: &Path, name: &str) -> Result<(), PackagerError> {
    super::run_tool(runner, XORRISO, INSTALL_HINT, arguments(source_dir, archive_path, name)).await
}

/// `xorriso -as mkisofs -o <out> -V <label> -udf -r <source>`
fn arguments(source_dir: &Path, archive_path: &Path, name: &str) -> Vec<OsString> {
    let label: String = name.chars().take(ISO_LABEL_MAX_CHARS).collect();

    vec!["-as".into(), "mkisofs".into(), "-o".into(), archive_path.into(), "-V".into(), label.into(), "-udf".into(), "-r".into(), source_dir.into()]
}
