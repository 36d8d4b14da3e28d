//! Command: obfuscate assemblies.
use anyhow::{Context as _, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::arguments::non_blank;
use crate::cli::ObfuscateOpts;
use crate::config::RunnerConfig;
use crate::environment::{Environment, SystemEnvironment};
use crate::logging::Logger;
use crate::runner::{EazfuscatorRunner, TOOL_NAME};
use crate::settings::ObfuscatorSettings;

/// A run after merging the config file with the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObfuscateJob {
    /// Assemblies to obfuscate.
    pub input_files: Vec<PathBuf>,
    /// Extra executable search directories.
    pub search_paths: Vec<PathBuf>,
    /// Effective settings.
    pub settings: ObfuscatorSettings,
}

impl ObfuscateJob {
    /// Merge `opts` on top of `config`.
    #[must_use]
    pub fn merge(config: RunnerConfig, opts: &ObfuscateOpts) -> Self {
        let input_files = if opts.input_files.is_empty() {
            config.input_files
        } else {
            opts.input_files.clone()
        };
        let mut search_paths = config.search_paths;
        search_paths.extend(opts.search_paths.iter().cloned());
        Self {
            input_files,
            search_paths,
            settings: opts.apply_to(config.settings),
        }
    }
}

/// Run the obfuscate command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the obfuscator
/// cannot be run to a successful exit.
pub fn run(opts: &ObfuscateOpts, log: &Logger) -> Result<()> {
    let env = Arc::new(SystemEnvironment::new().context("determining working directory")?);

    log.stage("Loading configuration");
    let config = RunnerConfig::load(opts.config.as_deref(), &env.working_directory())?;
    let job = ObfuscateJob::merge(config, opts);
    log.debug(&format!("{} input file(s)", job.input_files.len()));

    let runner = EazfuscatorRunner::for_environment(env, &job.search_paths);
    execute(&runner, &job, opts.dry_run, log)
}

/// Plan and, unless `dry_run`, run `job` with `runner`.
///
/// # Errors
///
/// Returns an error if there is nothing to obfuscate or the runner fails.
pub fn execute(
    runner: &EazfuscatorRunner,
    job: &ObfuscateJob,
    dry_run: bool,
    log: &Logger,
) -> Result<()> {
    if job.input_files.is_empty() && !needs_no_input(&job.settings) {
        anyhow::bail!("no input files given on the command line or in the configuration file");
    }

    if has_conflicting_keys(&job.settings) {
        log.warn("both --key-file and --key-container are set");
    }

    log.stage(&format!("Resolving {TOOL_NAME}"));
    let invocation = runner.plan(Some(&job.input_files), Some(&job.settings))?;
    log.info(&format!("executable: {}", invocation.executable.display()));

    if dry_run {
        log.dry_run(&format!(
            "would run in {}: {}",
            invocation.working_directory.display(),
            invocation.display_command()
        ));
        return Ok(());
    }

    log.stage(&format!("Running {TOOL_NAME}"));
    let exit = runner.execute(invocation)?;
    log.info(&format!("{TOOL_NAME} exited with code {}", exit.exit_code));
    Ok(())
}

/// Modes where the obfuscator does not operate on an input assembly.
///
/// Blank values count as unset, matching what reaches the command line.
fn needs_no_input(settings: &ObfuscatorSettings) -> bool {
    settings.check_version
        || settings.protect_project
        || settings.unprotect_project
        || non_blank(settings.decode_stack_trace_with_password.as_deref()).is_some()
        || non_blank(settings.error_sandbox.as_deref()).is_some()
}

/// Both signing sources set; passed through for the obfuscator to reject.
fn has_conflicting_keys(settings: &ObfuscatorSettings) -> bool {
    settings.key_file.is_some() && non_blank(settings.key_container.as_deref()).is_some()
}
