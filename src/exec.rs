//! Process seam: start the obfuscator and wait for its exit code.
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Child, Command};

use crate::arguments::ProcessArguments;

/// Everything needed to start the obfuscator process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    /// Absolute path of the executable.
    pub program: PathBuf,
    /// Command-line arguments.
    pub arguments: ProcessArguments,
    /// Current directory of the new process.
    pub working_directory: PathBuf,
    /// Extra environment variables, on top of the inherited environment.
    pub environment: BTreeMap<String, String>,
}

/// A started process that can be waited on.
pub trait ProcessHandle: Send {
    /// Block until the process exits and return its exit code.
    ///
    /// A process terminated without an exit code (e.g. by a signal) reports
    /// `-1`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to report the process status.
    fn wait_for_exit(&mut self) -> std::io::Result<i32>;
}

/// Starts OS processes.
///
/// Production code uses [`SystemProcessRunner`]; tests record the request
/// and hand back a canned exit code instead.
pub trait ProcessRunner: Send + Sync {
    /// Start the process described by `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process could not be started.
    fn start(&self, request: &ProcessRequest) -> std::io::Result<Box<dyn ProcessHandle>>;
}

/// [`ProcessRunner`] backed by [`std::process::Command`].
///
/// Standard streams are inherited, so the obfuscator's output goes straight
/// to the console.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Build the [`Command`] for `request` without starting it.
    #[must_use]
    pub fn command(request: &ProcessRequest) -> Command {
        let mut cmd = Command::new(&request.program);
        cmd.current_dir(&request.working_directory)
            .envs(&request.environment);

        // Windows programs parse their own command line, so the quoted
        // rendering is passed through untouched.
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt as _;
            if !request.arguments.is_empty() {
                cmd.raw_arg(request.arguments.render());
            }
        }

        #[cfg(not(windows))]
        cmd.args(request.arguments.values());

        cmd
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn start(&self, request: &ProcessRequest) -> std::io::Result<Box<dyn ProcessHandle>> {
        let child = Self::command(request).spawn()?;
        Ok(Box::new(ChildHandle(child)))
    }
}

/// [`ProcessHandle`] for a spawned [`Child`].
#[derive(Debug)]
struct ChildHandle(Child);

impl ProcessHandle for ChildHandle {
    fn wait_for_exit(&mut self) -> std::io::Result<i32> {
        let status = self.0.wait()?;
        Ok(status.code().unwrap_or(-1))
    }
}
