//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::settings::ObfuscatorSettings;

/// Top-level CLI entry point for the obfuscator runner.
#[derive(Parser, Debug)]
#[command(
    name = "eazfuscator-runner",
    about = "Run the Eazfuscator.NET obfuscator from build scripts",
    version
)]
pub struct Cli {
    /// Available subcommands.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Obfuscate one or more assemblies
    Obfuscate(Box<ObfuscateOpts>),
    /// Print version information
    Version,
}

/// Options for the `obfuscate` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct ObfuscateOpts {
    /// Assemblies to obfuscate (replaces `input-files` from the config file)
    #[arg(value_name = "INPUT_FILES")]
    pub input_files: Vec<PathBuf>,

    /// Configuration file [default: eazfuscator.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to Eazfuscator.Net.exe (disables lookup)
    #[arg(long, value_name = "FILE")]
    pub tool_path: Option<PathBuf>,

    /// Working directory of the obfuscator process
    #[arg(long, value_name = "DIR")]
    pub working_directory: Option<PathBuf>,

    /// Extra directory to search for the executable (repeatable)
    #[arg(long = "search-path", value_name = "DIR")]
    pub search_paths: Vec<PathBuf>,

    /// Print the command line without running it
    #[arg(short = 'd', long)]
    pub dry_run: bool,

    /// Environment variable for the obfuscator process (repeatable)
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_var)]
    pub env: Vec<(String, String)>,

    /// Obfuscator options.
    #[command(flatten)]
    pub obfuscator: ObfuscatorArgs,
}

/// Command-line spellings of [`ObfuscatorSettings`] fields.
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Obfuscator options")]
#[allow(clippy::struct_excessive_bools)]
pub struct ObfuscatorArgs {
    /// Suppress the logo message
    #[arg(long)]
    pub nologo: bool,

    /// Output file for the obfuscated assembly
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Key file used to re-sign the assembly
    #[arg(long, value_name = "FILE")]
    pub key_file: Option<PathBuf>,

    /// Key container used to re-sign the assembly
    #[arg(long, value_name = "NAME")]
    pub key_container: Option<String>,

    /// Suppress informational messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Decode an encrypted stack trace read from stdin
    #[arg(long, value_name = "PASSWORD")]
    pub decode_stack_trace_with_password: Option<String>,

    /// Run an application in an exception sandbox
    #[arg(long, value_name = "APP")]
    pub error_sandbox: Option<String>,

    /// Check that the input file is obfuscated
    #[arg(long)]
    pub ensure_obfuscated: bool,

    /// MSBuild project file
    #[arg(long, value_name = "FILE")]
    pub msbuild_project_path: Option<PathBuf>,

    /// MSBuild project configuration
    #[arg(long, value_name = "CONFIGURATION")]
    pub msbuild_project_configuration: Option<String>,

    /// MSBuild project platform
    #[arg(long, value_name = "PLATFORM")]
    pub msbuild_project_platform: Option<String>,

    /// MSBuild solution file
    #[arg(long, value_name = "FILE")]
    pub msbuild_solution_path: Option<PathBuf>,

    /// Enable obfuscation for the MSBuild project
    #[arg(long)]
    pub protect_project: bool,

    /// Disable obfuscation for the MSBuild project
    #[arg(long)]
    pub unprotect_project: bool,

    /// Compatibility version
    #[arg(long, value_name = "VERSION")]
    pub compatibility_version: Option<String>,

    /// Check for a newer version of the obfuscator
    #[arg(long)]
    pub check_version: bool,

    /// Directories probed for referenced assemblies (`;`-separated or repeated)
    #[arg(long, value_name = "PATHS", value_delimiter = ';')]
    pub probing_paths: Vec<PathBuf>,

    /// Warnings to treat as errors
    #[arg(long, value_name = "WARNINGS")]
    pub warnings_as_errors: Option<String>,

    /// Obfuscation configuration file
    #[arg(long, value_name = "FILE")]
    pub configuration_file: Option<PathBuf>,

    /// Print statistics
    #[arg(long)]
    pub statistics: bool,

    /// Flush console output at each newline
    #[arg(long)]
    pub newline_flush: bool,
}

impl ObfuscateOpts {
    /// Overlay command-line options onto `settings` loaded from the config
    /// file.
    ///
    /// Flags only ever turn options on; valued options replace the configured
    /// value; `--env` entries are added on top of configured variables.
    #[must_use]
    pub fn apply_to(&self, mut settings: ObfuscatorSettings) -> ObfuscatorSettings {
        let a = &self.obfuscator;

        replace(&mut settings.tool_path, self.tool_path.as_ref());
        replace(&mut settings.working_directory, self.working_directory.as_ref());
        settings.environment_variables.extend(self.env.iter().cloned());

        settings.no_logo |= a.nologo;
        replace(&mut settings.output_file, a.output.as_ref());
        replace(&mut settings.key_file, a.key_file.as_ref());
        replace(&mut settings.key_container, a.key_container.as_ref());
        settings.quiet |= a.quiet;
        replace(
            &mut settings.decode_stack_trace_with_password,
            a.decode_stack_trace_with_password.as_ref(),
        );
        replace(&mut settings.error_sandbox, a.error_sandbox.as_ref());
        settings.ensure_obfuscated |= a.ensure_obfuscated;
        replace(&mut settings.msbuild_project_path, a.msbuild_project_path.as_ref());
        replace(
            &mut settings.msbuild_project_configuration,
            a.msbuild_project_configuration.as_ref(),
        );
        replace(
            &mut settings.msbuild_project_platform,
            a.msbuild_project_platform.as_ref(),
        );
        replace(&mut settings.msbuild_solution_path, a.msbuild_solution_path.as_ref());
        settings.protect_project |= a.protect_project;
        settings.unprotect_project |= a.unprotect_project;
        replace(&mut settings.compatibility_version, a.compatibility_version.as_ref());
        settings.check_version |= a.check_version;
        if !a.probing_paths.is_empty() {
            settings.probing_paths = Some(a.probing_paths.clone());
        }
        replace(&mut settings.warnings_as_errors, a.warnings_as_errors.as_ref());
        replace(&mut settings.configuration_file, a.configuration_file.as_ref());
        settings.statistics |= a.statistics;
        settings.newline_flush |= a.newline_flush;

        settings
    }
}

fn replace<T: Clone>(target: &mut Option<T>, value: Option<&T>) {
    if let Some(v) = value {
        *target = Some(v.clone());
    }
}

fn parse_env_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn obfuscate(args: &[&str]) -> ObfuscateOpts {
        let cli = Cli::parse_from(
            ["eazfuscator-runner", "obfuscate"]
                .iter()
                .chain(args)
                .copied(),
        );
        match cli.command {
            Command::Obfuscate(opts) => *opts,
            Command::Version => panic!("expected obfuscate command"),
        }
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["eazfuscator-runner", "version"]);
        assert!(matches!(cli.command, Command::Version));
    }

    #[test]
    fn parse_verbose_after_subcommand() {
        let cli = Cli::parse_from(["eazfuscator-runner", "obfuscate", "-v", "a.dll"]);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_input_files_in_order() {
        let opts = obfuscate(&["b.dll", "a.dll"]);
        assert_eq!(
            opts.input_files,
            vec![PathBuf::from("b.dll"), PathBuf::from("a.dll")]
        );
    }

    #[test]
    fn parse_dry_run_short() {
        assert!(obfuscate(&["-d"]).dry_run);
    }

    #[test]
    fn parse_search_paths_repeated() {
        let opts = obfuscate(&["--search-path", "a", "--search-path", "b"]);
        assert_eq!(opts.search_paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn parse_probing_paths_split_on_semicolon() {
        let opts = obfuscate(&["--probing-paths", "lib;packages", "--probing-paths", "extra"]);
        assert_eq!(
            opts.obfuscator.probing_paths,
            vec![
                PathBuf::from("lib"),
                PathBuf::from("packages"),
                PathBuf::from("extra")
            ]
        );
    }

    #[test]
    fn parse_env_pairs() {
        let opts = obfuscate(&["--env", "A=1", "--env", "B=x=y"]);
        assert_eq!(
            opts.env,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "x=y".to_string())
            ]
        );
    }

    #[test]
    fn reject_env_without_equals() {
        let result = Cli::try_parse_from(["eazfuscator-runner", "obfuscate", "--env", "A"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_short_output_and_quiet() {
        let opts = obfuscate(&["-o", "out.dll", "-q"]);
        assert_eq!(opts.obfuscator.output, Some(PathBuf::from("out.dll")));
        assert!(opts.obfuscator.quiet);
    }

    #[test]
    fn apply_flags_turn_settings_on() {
        let opts = obfuscate(&["--nologo", "--statistics"]);
        let settings = opts.apply_to(ObfuscatorSettings::default());
        assert!(settings.no_logo);
        assert!(settings.statistics);
        assert!(!settings.quiet);
    }

    #[test]
    fn apply_keeps_configured_values_when_not_given() {
        let base = ObfuscatorSettings {
            quiet: true,
            key_container: Some("Release".to_string()),
            probing_paths: Some(vec![PathBuf::from("lib")]),
            ..ObfuscatorSettings::default()
        };
        let settings = obfuscate(&[]).apply_to(base.clone());
        assert_eq!(settings, base);
    }

    #[test]
    fn apply_values_replace_configured_values() {
        let base = ObfuscatorSettings {
            output_file: Some(PathBuf::from("config.dll")),
            probing_paths: Some(vec![PathBuf::from("lib")]),
            ..ObfuscatorSettings::default()
        };
        let settings =
            obfuscate(&["--output", "cli.dll", "--probing-paths", "other"]).apply_to(base);
        assert_eq!(settings.output_file, Some(PathBuf::from("cli.dll")));
        assert_eq!(settings.probing_paths, Some(vec![PathBuf::from("other")]));
    }

    #[test]
    fn apply_env_adds_to_configured_variables() {
        let base = ObfuscatorSettings {
            environment_variables: [("A".to_string(), "config".to_string())].into(),
            ..ObfuscatorSettings::default()
        };
        let settings = obfuscate(&["--env", "A=cli", "--env", "B=2"]).apply_to(base);
        assert_eq!(settings.environment_variables["A"], "cli");
        assert_eq!(settings.environment_variables["B"], "2");
    }

    #[test]
    fn apply_tool_path_and_working_directory() {
        let settings = obfuscate(&["--tool-path", "t/Eaz.exe", "--working-directory", "build"])
            .apply_to(ObfuscatorSettings::default());
        assert_eq!(settings.tool_path, Some(PathBuf::from("t/Eaz.exe")));
        assert_eq!(settings.working_directory, Some(PathBuf::from("build")));
    }
}
