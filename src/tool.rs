//! External tool invocation.
//!
//! The packager and the PAR2 generator never spawn processes directly; they go
//! through [`ToolRunner`], which exposes the two capabilities they need:
//! locating a binary on `PATH` and running it to completion with captured
//! output. [`SystemRunner`] is the real implementation.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Captured result of a finished tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the tool exited with code zero.
    #[inline]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Capability to find and run external binaries.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Searches `PATH` for `name`.
    fn locate(&self, name: &str) -> Option<PathBuf>;

    /// Runs `program` with `args`, waiting for it to exit.
    ///
    /// There is no timeout: a hung tool blocks the caller.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised when the process cannot be started.
    async fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ToolOutput>;
}

/// Runs tools found on the real `PATH`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl ToolRunner for SystemRunner {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    async fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ToolOutput> {
        debug!(program = %program.display(), ?args, "running external tool");

        let output = Command::new(program).args(args).output().await?;

        let result = ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(program = %program.display(), code = ?result.code, "external tool finished");
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted [`ToolRunner`] for tests.

    use std::sync::Mutex;

    use super::*;

    type Effect = Box<dyn Fn(&[OsString]) + Send + Sync>;

    /// Pretends a fixed set of tools is installed and records every run.
    pub struct FakeRunner {
        installed: Vec<&'static str>,
        output: ToolOutput,
        effect: Option<Effect>,
        pub calls: Mutex<Vec<(PathBuf, Vec<OsString>)>>,
    }

    impl FakeRunner {
        pub fn with_tools(installed: &[&'static str]) -> Self {
            Self { installed: installed.to_vec(), output: ToolOutput { code: Some(0), ..ToolOutput::default() }, effect: None, calls: Mutex::new(Vec::new()) }
        }

        pub fn none() -> Self {
            Self::with_tools(&[])
        }

        /// Makes every run return `output`.
        pub fn returning(mut self, output: ToolOutput) -> Self {
            self.output = output;
            self
        }

        /// Runs `effect` with the arguments of each successful invocation, e.g. to
        /// create the files the real tool would write.
        pub fn on_run(mut self, effect: impl Fn(&[OsString]) + Send + Sync + 'static) -> Self {
            self.effect = Some(Box::new(effect));
            self
        }

        pub fn recorded(&self) -> Vec<(PathBuf, Vec<OsString>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolRunner for FakeRunner {
        fn locate(&self, name: &str) -> Option<PathBuf> {
            self.installed.iter().any(|tool| *tool == name).then(|| PathBuf::from("/usr/bin").join(name))
        }

        async fn run(&self, program: &Path, args: &[OsString]) -> io::Result<ToolOutput> {
            self.calls.lock().unwrap().push((program.to_path_buf(), args.to_vec()));
            if self.output.success()
                && let Some(effect) = &self.effect
            {
                effect(args);
            }
            Ok(self.output.clone())
        }
    }

    pub fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_requires_zero_code() {
        assert!(ToolOutput { code: Some(0), ..ToolOutput::default() }.success());
        assert!(!ToolOutput { code: Some(1), ..ToolOutput::default() }.success());
        assert!(!ToolOutput::default().success());
    }

    #[test]
    fn test_locate_nonexistent_binary() {
        assert!(SystemRunner.locate("nonexistent-lam-binary-xyz").is_none());
    }

    #[tokio::test]
    async fn test_run_invalid_binary_path_is_io_error() {
        let result = SystemRunner.run(Path::new("/nonexistent/path/to/tool"), &[]).await;
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_captures_output_and_code() {
        let Some(sh) = SystemRunner.locate("sh") else {
            return;
        };
        let args = fake::os_args(&["-c", "echo out; echo err >&2; exit 3"]);
        let output = SystemRunner.run(&sh, &args).await.unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }
}
