//! Command-line arguments for the obfuscator and the settings-to-arguments
//! mapping.
//!
//! [`build_arguments`] is the whole wire contract with `Eazfuscator.Net.exe`:
//! input files first, each quoted, then one entry per present setting in a
//! fixed order. The order is relied upon by anything that snapshots the
//! generated command line, so new options must be appended in the position
//! the obfuscator documents, never sorted.
use std::fmt;
use std::path::{Path, PathBuf};

use crate::environment::{full_path, make_absolute};
use crate::settings::ObfuscatorSettings;

/// Placeholder shown instead of secret values in log output.
const REDACTED: &str = "[REDACTED]";

/// A single command-line token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// Emitted verbatim, e.g. `--nologo`.
    Text(String),
    /// Emitted wrapped in double quotes.
    Quoted(String),
    /// Emitted like [`Argument::Quoted`], but hidden in [`Argument::render_safe`].
    QuotedSecret(String),
}

impl Argument {
    /// The raw value without quoting, as the process receives it in `argv`.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Text(v) | Self::Quoted(v) | Self::QuotedSecret(v) => v,
        }
    }

    /// The token as it appears on the command line.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(v) => v.clone(),
            Self::Quoted(v) | Self::QuotedSecret(v) => quote(v),
        }
    }

    /// Like [`render`](Self::render), with secrets replaced by a placeholder.
    #[must_use]
    pub fn render_safe(&self) -> String {
        match self {
            Self::QuotedSecret(_) => quote(REDACTED),
            other => other.render(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn quote(value: &str) -> String {
    let already_quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    if already_quoted {
        value.to_string()
    } else {
        format!("\"{value}\"")
    }
}

/// Ordered list of command-line tokens.
///
/// # Examples
///
/// ```
/// use eazfuscator_runner::arguments::ProcessArguments;
///
/// let mut args = ProcessArguments::new();
/// args.append_quoted("/Working/App.dll")
///     .append("--nologo")
///     .append("--decode-stack-trace-with-password")
///     .append_quoted_secret("hunter2");
///
/// assert_eq!(
///     args.render(),
///     r#""/Working/App.dll" --nologo --decode-stack-trace-with-password "hunter2""#
/// );
/// assert_eq!(
///     args.render_safe(),
///     r#""/Working/App.dll" --nologo --decode-stack-trace-with-password "[REDACTED]""#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessArguments {
    args: Vec<Argument>,
}

impl ProcessArguments {
    /// Create an empty argument list.
    #[must_use]
    pub const fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Append a verbatim token.
    pub fn append(&mut self, text: impl Into<String>) -> &mut Self {
        self.args.push(Argument::Text(text.into()));
        self
    }

    /// Append a quoted token.
    pub fn append_quoted(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(Argument::Quoted(value.into()));
        self
    }

    /// Append a quoted token whose value must not appear in logs.
    pub fn append_quoted_secret(&mut self, value: impl Into<String>) -> &mut Self {
        self.args.push(Argument::QuotedSecret(value.into()));
        self
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether no token has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Iterate over the tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Argument> {
        self.args.iter()
    }

    /// Rendered tokens, one string per token.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.args.iter().map(Argument::render).collect()
    }

    /// Unquoted values, one per token, for passing as separate `argv` entries.
    #[must_use]
    pub fn values(&self) -> Vec<&str> {
        self.args.iter().map(Argument::value).collect()
    }

    /// The full command line: rendered tokens joined with single spaces.
    #[must_use]
    pub fn render(&self) -> String {
        self.tokens().join(" ")
    }

    /// Like [`render`](Self::render), with secrets redacted. Use for logging.
    #[must_use]
    pub fn render_safe(&self) -> String {
        self.args
            .iter()
            .map(Argument::render_safe)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ProcessArguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<'a> IntoIterator for &'a ProcessArguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// `Some` when the string holds something other than whitespace.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Build the obfuscator command line for `input_files` and `settings`.
///
/// Every path, input files included, is made absolute against
/// `working_directory`. The result depends only on the inputs.
///
/// # Examples
///
/// ```
/// use eazfuscator_runner::arguments::build_arguments;
/// use eazfuscator_runner::settings::ObfuscatorSettings;
/// use std::path::{Path, PathBuf};
///
/// let settings = ObfuscatorSettings {
///     output_file: Some("output/test.dll".into()),
///     ..ObfuscatorSettings::default()
/// };
/// let args = build_arguments(&[PathBuf::from("input/test.dll")], &settings, Path::new("/Working"));
/// assert_eq!(
///     args.render(),
///     r#""/Working/input/test.dll" --output "/Working/output/test.dll""#
/// );
/// ```
#[must_use]
pub fn build_arguments(
    input_files: &[PathBuf],
    settings: &ObfuscatorSettings,
    working_directory: &Path,
) -> ProcessArguments {
    let absolute = |path: &PathBuf| full_path(&make_absolute(path, working_directory));

    let mut args = ProcessArguments::new();

    for input_file in input_files {
        args.append_quoted(absolute(input_file));
    }

    let flag = |args: &mut ProcessArguments, enabled: bool, name: &str| {
        if enabled {
            args.append(name);
        }
    };

    flag(&mut args, settings.no_logo, "--nologo");

    if let Some(path) = &settings.output_file {
        args.append("--output").append_quoted(absolute(path));
    }

    if let Some(path) = &settings.key_file {
        args.append("--key-file").append_quoted(absolute(path));
    }

    if let Some(container) = non_blank(settings.key_container.as_deref()) {
        args.append("--key-container").append_quoted(container);
    }

    flag(&mut args, settings.quiet, "--quiet");

    if let Some(password) = non_blank(settings.decode_stack_trace_with_password.as_deref()) {
        args.append("--decode-stack-trace-with-password")
            .append_quoted_secret(password);
    }

    if let Some(sandbox) = non_blank(settings.error_sandbox.as_deref()) {
        args.append("--error-sandbox").append_quoted(sandbox);
    }

    flag(&mut args, settings.ensure_obfuscated, "--ensure-obfuscated");

    if let Some(path) = &settings.msbuild_project_path {
        args.append("--msbuild-project-path")
            .append_quoted(absolute(path));
    }

    if let Some(configuration) = non_blank(settings.msbuild_project_configuration.as_deref()) {
        args.append("--msbuild-project-configuration")
            .append_quoted(configuration);
    }

    if let Some(platform) = non_blank(settings.msbuild_project_platform.as_deref()) {
        args.append("--msbuild-project-platform")
            .append_quoted(platform);
    }

    if let Some(path) = &settings.msbuild_solution_path {
        args.append("--msbuild-solution-path")
            .append_quoted(absolute(path));
    }

    flag(&mut args, settings.protect_project, "--protect-project");
    flag(&mut args, settings.unprotect_project, "--unprotect-project");

    if let Some(version) = non_blank(settings.compatibility_version.as_deref()) {
        args.append("--compatibility-version").append_quoted(version);
    }

    flag(&mut args, settings.check_version, "--check-version");

    if let Some(paths) = &settings.probing_paths {
        let joined = paths
            .iter()
            .map(absolute)
            .collect::<Vec<_>>()
            .join(";");
        args.append("--probing-paths").append_quoted(joined);
    }

    if let Some(warnings) = non_blank(settings.warnings_as_errors.as_deref()) {
        args.append("--warnings-as-errors").append_quoted(warnings);
    }

    if let Some(path) = &settings.configuration_file {
        args.append("--configuration-file")
            .append_quoted(absolute(path));
    }

    flag(&mut args, settings.statistics, "--statistics");
    flag(&mut args, settings.newline_flush, "--newline-flush");

    args
}
