//! Resolve, spawn, await and classify one obfuscator invocation.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::arguments::{ProcessArguments, build_arguments};
use crate::environment::{Environment, SystemEnvironment, make_absolute};
use crate::error::RunnerError;
use crate::exec::{ProcessRequest, ProcessRunner, SystemProcessRunner};
use crate::locator::{SystemToolLocator, ToolLocator};
use crate::operations::SystemFileSystemOps;
use crate::platform::Platform;
use crate::settings::ObfuscatorSettings;

/// Logical tool name used in error messages.
pub const TOOL_NAME: &str = "Eazfuscator.Net";

/// File name of the obfuscator executable.
pub const EXECUTABLE_NAME: &str = "Eazfuscator.Net.exe";

/// A fully resolved invocation that has not been started yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Absolute path of the resolved executable.
    pub executable: PathBuf,
    /// Working directory of the process.
    pub working_directory: PathBuf,
    /// Command-line arguments.
    pub arguments: ProcessArguments,
    /// Extra environment variables.
    pub environment: BTreeMap<String, String>,
}

impl Invocation {
    /// The rendered argument string, as passed to the process.
    #[must_use]
    pub fn args(&self) -> String {
        self.arguments.render()
    }

    /// The full command line with secrets redacted, for display.
    #[must_use]
    pub fn display_command(&self) -> String {
        let exe = format!("\"{}\"", self.executable.display());
        if self.arguments.is_empty() {
            exe
        } else {
            format!("{exe} {}", self.arguments.render_safe())
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitInfo {
    /// Absolute path of the executable that ran.
    pub executable: PathBuf,
    /// Working directory the process ran in.
    pub working_directory: PathBuf,
    /// Arguments the process was started with.
    pub arguments: ProcessArguments,
    /// Exit code reported by the process (always `0` on success).
    pub exit_code: i32,
}

impl ExitInfo {
    /// The rendered argument string the process was started with.
    #[must_use]
    pub fn args(&self) -> String {
        self.arguments.render()
    }
}

/// Runs `Eazfuscator.Net.exe` with arguments built from
/// [`ObfuscatorSettings`].
///
/// The runner holds only shared, immutable collaborators; independent
/// invocations may run concurrently from several threads.
pub struct EazfuscatorRunner {
    environment: Arc<dyn Environment>,
    locator: Arc<dyn ToolLocator>,
    process_runner: Arc<dyn ProcessRunner>,
}

impl std::fmt::Debug for EazfuscatorRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EazfuscatorRunner")
            .field("working_directory", &self.environment.working_directory())
            .field("locator", &"<dyn ToolLocator>")
            .field("process_runner", &"<dyn ProcessRunner>")
            .finish()
    }
}

impl EazfuscatorRunner {
    /// Create a runner from explicit collaborators.
    #[must_use]
    pub const fn new(
        environment: Arc<dyn Environment>,
        locator: Arc<dyn ToolLocator>,
        process_runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self {
            environment,
            locator,
            process_runner,
        }
    }

    /// Create a runner for the current process: its working directory,
    /// the standard tool lookup (plus `search_dirs`) and real processes.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn system(search_dirs: &[PathBuf]) -> std::io::Result<Self> {
        Ok(Self::for_environment(
            Arc::new(SystemEnvironment::new()?),
            search_dirs,
        ))
    }

    /// Like [`system`](Self::system), with a caller-supplied environment.
    #[must_use]
    pub fn for_environment(environment: Arc<dyn Environment>, search_dirs: &[PathBuf]) -> Self {
        let platform = Platform::detect();
        tracing::debug!("detected platform: {}", platform.os);
        let locator = SystemToolLocator::for_environment(
            environment.as_ref(),
            &platform,
            Arc::new(SystemFileSystemOps),
            search_dirs,
        );
        Self::new(environment, Arc::new(locator), Arc::new(SystemProcessRunner))
    }

    /// Resolve the executable and build the arguments without starting
    /// anything.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidArgument`] if `input_files` or
    /// `settings` is `None`, and [`RunnerError::ExecutableNotFound`] if the
    /// executable cannot be located.
    pub fn plan(
        &self,
        input_files: Option<&[PathBuf]>,
        settings: Option<&ObfuscatorSettings>,
    ) -> Result<Invocation, RunnerError> {
        let input_files = input_files.ok_or(RunnerError::InvalidArgument {
            parameter: "input_files",
        })?;
        let settings = settings.ok_or(RunnerError::InvalidArgument {
            parameter: "settings",
        })?;

        let cwd = self.environment.working_directory();
        let arguments = build_arguments(input_files, settings, &cwd);
        let executable = self.resolve_executable(settings, &cwd)?;
        let working_directory = settings
            .working_directory
            .as_deref()
            .map_or_else(|| cwd.clone(), |dir| make_absolute(dir, &cwd));

        Ok(Invocation {
            executable,
            working_directory,
            arguments,
            environment: settings.environment_variables.clone(),
        })
    }

    /// Run the obfuscator on `input_files` and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns every [`RunnerError`] variant: see [`plan`](Self::plan) for the
    /// ones raised before the process starts, then
    /// [`ProcessNotStarted`](RunnerError::ProcessNotStarted),
    /// [`ProcessWait`](RunnerError::ProcessWait) or
    /// [`ProcessFailed`](RunnerError::ProcessFailed).
    pub fn run(
        &self,
        input_files: Option<&[PathBuf]>,
        settings: Option<&ObfuscatorSettings>,
    ) -> Result<ExitInfo, RunnerError> {
        let invocation = self.plan(input_files, settings)?;
        self.execute(invocation)
    }

    /// Start an already planned invocation and classify its exit code.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::ProcessNotStarted`],
    /// [`RunnerError::ProcessWait`] or [`RunnerError::ProcessFailed`].
    pub fn execute(&self, invocation: Invocation) -> Result<ExitInfo, RunnerError> {
        tracing::debug!(
            "executing {} in {}",
            invocation.display_command(),
            invocation.working_directory.display()
        );

        let request = ProcessRequest {
            program: invocation.executable,
            arguments: invocation.arguments,
            working_directory: invocation.working_directory,
            environment: invocation.environment,
        };
        let mut handle = self.process_runner.start(&request).map_err(|source| {
            tracing::debug!("failed to start {}: {source}", request.program.display());
            RunnerError::ProcessNotStarted {
                tool: TOOL_NAME.to_string(),
                source,
            }
        })?;

        let exit_code = handle
            .wait_for_exit()
            .map_err(|source| RunnerError::ProcessWait {
                tool: TOOL_NAME.to_string(),
                source,
            })?;

        if exit_code != 0 {
            tracing::debug!("{TOOL_NAME} exited with code {exit_code}");
            return Err(RunnerError::ProcessFailed {
                tool: TOOL_NAME.to_string(),
                exit_code,
            });
        }

        tracing::debug!("{TOOL_NAME} exited with code 0");
        Ok(ExitInfo {
            executable: request.program,
            working_directory: request.working_directory,
            arguments: request.arguments,
            exit_code,
        })
    }

    /// Obfuscate a single file with default settings.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn obfuscate_file(&self, input_file: impl Into<PathBuf>) -> Result<ExitInfo, RunnerError> {
        self.obfuscate_file_with(input_file, &ObfuscatorSettings::default())
    }

    /// Obfuscate several files with default settings.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn obfuscate_files(&self, input_files: &[PathBuf]) -> Result<ExitInfo, RunnerError> {
        self.obfuscate_files_with(input_files, &ObfuscatorSettings::default())
    }

    /// Obfuscate a single file with `settings`.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn obfuscate_file_with(
        &self,
        input_file: impl Into<PathBuf>,
        settings: &ObfuscatorSettings,
    ) -> Result<ExitInfo, RunnerError> {
        self.obfuscate_files_with(&[input_file.into()], settings)
    }

    /// Obfuscate several files with `settings`.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn obfuscate_files_with(
        &self,
        input_files: &[PathBuf],
        settings: &ObfuscatorSettings,
    ) -> Result<ExitInfo, RunnerError> {
        self.run(Some(input_files), Some(settings))
    }

    fn resolve_executable(
        &self,
        settings: &ObfuscatorSettings,
        cwd: &Path,
    ) -> Result<PathBuf, RunnerError> {
        let explicit = settings
            .tool_path
            .as_deref()
            .map(|path| make_absolute(path, cwd));

        let path = self
            .locator
            .locate(EXECUTABLE_NAME, explicit.as_deref())
            .ok_or_else(|| RunnerError::ExecutableNotFound {
                tool: TOOL_NAME.to_string(),
            })?;
        tracing::debug!("resolved {TOOL_NAME} executable: {}", path.display());
        Ok(path)
    }
}
