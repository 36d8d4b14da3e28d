//! Settings record for a single obfuscator invocation.
//!
//! See the Eazfuscator.NET
//! [command line interface](https://help.gapotchenko.com/eazfuscator.net/45/deployment/command-line-interface)
//! documentation, or run `Eazfuscator.Net.exe --help`, for the meaning of
//! each option.
use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Options passed to `Eazfuscator.Net.exe`.
///
/// Every field is independently optional. Absent fields (`None` or `false`)
/// contribute nothing to the command line. Mutually exclusive options (for
/// example [`key_file`](Self::key_file) and
/// [`key_container`](Self::key_container)) are passed through unchecked; the
/// obfuscator reports the conflict itself.
///
/// # Examples
///
/// ```
/// use eazfuscator_runner::settings::ObfuscatorSettings;
///
/// let settings = ObfuscatorSettings {
///     no_logo: true,
///     output_file: Some("obfuscated/App.dll".into()),
///     ..ObfuscatorSettings::default()
/// };
/// assert!(!settings.quiet);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct ObfuscatorSettings {
    /// Explicit path to the obfuscator executable. Relative paths are
    /// resolved against the working directory; no fallback search happens
    /// when this is set.
    pub tool_path: Option<PathBuf>,

    /// Working directory of the spawned process. Defaults to the
    /// environment's working directory.
    pub working_directory: Option<PathBuf>,

    /// Extra environment variables set on the spawned process.
    pub environment_variables: BTreeMap<String, String>,

    /// Suppress the logo message.
    pub no_logo: bool,

    /// Output file for the obfuscated assembly.
    ///
    /// Without it the output overwrites the input file. Cannot be used with
    /// multiple input files.
    pub output_file: Option<PathBuf>,

    /// Key file used to re-sign the obfuscated assembly.
    ///
    /// Assemblies that had a strong name before obfuscation must be re-signed
    /// to load. Assemblies without a strong name are not affected.
    pub key_file: Option<PathBuf>,

    /// Key container used to re-sign the obfuscated assembly. Cannot be used
    /// with [`key_file`](Self::key_file).
    pub key_container: Option<String>,

    /// Suppress informational and diagnostic messages.
    pub quiet: bool,

    /// Decode an encrypted stack trace with this password.
    ///
    /// The encrypted trace is read from standard input and the decoded trace
    /// written to standard output.
    pub decode_stack_trace_with_password: Option<String>,

    /// Run the given application in an exception sandbox.
    pub error_sandbox: Option<String>,

    /// Check that the input file is obfuscated.
    pub ensure_obfuscated: bool,

    /// Path to an MSBuild project.
    pub msbuild_project_path: Option<PathBuf>,

    /// MSBuild project configuration name.
    pub msbuild_project_configuration: Option<String>,

    /// MSBuild project platform.
    pub msbuild_project_platform: Option<String>,

    /// Path to an MSBuild solution.
    pub msbuild_solution_path: Option<PathBuf>,

    /// Obfuscate the project on every build. Use with
    /// [`msbuild_project_path`](Self::msbuild_project_path).
    pub protect_project: bool,

    /// Remove project protection. Use with
    /// [`msbuild_project_path`](Self::msbuild_project_path).
    pub unprotect_project: bool,

    /// Version of Eazfuscator.NET to stay compatible with.
    pub compatibility_version: Option<String>,

    /// Check the installed version and report it as the exit code. Cannot be
    /// combined with other options.
    pub check_version: bool,

    /// Directories searched for referenced assemblies.
    ///
    /// `Some(vec![])` is still emitted, as an empty list.
    pub probing_paths: Option<Vec<PathBuf>>,

    /// Comma-separated warning codes to treat as errors, or `all`.
    pub warnings_as_errors: Option<String>,

    /// Configuration file (C# or VB.NET attributes) for obfuscation.
    pub configuration_file: Option<PathBuf>,

    /// Produce an obfuscation statistics report.
    pub statistics: bool,

    /// Flush output messages with new line symbols. Useful for IDE
    /// integration.
    pub newline_flush: bool,
}
