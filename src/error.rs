//! Domain-specific error types for the obfuscator runner.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library modules return typed errors ([`RunnerError`], [`ConfigError`])
//! while command handlers at the CLI boundary convert them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! RunnerError
//! ├── InvalidArgument     a required input was not supplied
//! ├── ExecutableNotFound  no explicit path and no lookup location matched
//! ├── ProcessNotStarted   the OS refused to spawn the executable
//! ├── ProcessWait         the process could not be awaited
//! └── ProcessFailed       the executable exited with a non-zero code
//!
//! ConfigError
//! ├── Io                  the configuration file could not be read
//! └── Parse               the configuration file is not valid TOML
//! ```

use thiserror::Error;

/// Errors that arise while preparing or running the obfuscator.
///
/// Every variant is fatal to the invocation; nothing is retried.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// A required argument was absent. Detected before any path resolution
    /// or process interaction.
    #[error("Argument '{parameter}' must not be null.")]
    InvalidArgument {
        /// Name of the offending parameter (`input_files` or `settings`).
        parameter: &'static str,
    },

    /// Neither the explicit tool path nor any lookup location yielded the
    /// executable.
    #[error("{tool}: Could not locate executable.")]
    ExecutableNotFound {
        /// Logical tool name.
        tool: String,
    },

    /// The executable was found but the OS process could not be started.
    #[error("{tool}: Process was not started.")]
    ProcessNotStarted {
        /// Logical tool name.
        tool: String,
        /// Underlying spawn error.
        source: std::io::Error,
    },

    /// The process started but waiting for its exit failed.
    #[error("{tool}: Failed while waiting for the process to exit.")]
    ProcessWait {
        /// Logical tool name.
        tool: String,
        /// Underlying wait error.
        source: std::io::Error,
    },

    /// The executable ran and returned a non-zero exit code.
    #[error("{tool}: Process returned an error (exit code {exit_code}).")]
    ProcessFailed {
        /// Logical tool name.
        tool: String,
        /// Exit code reported by the process (`-1` when terminated without one).
        exit_code: i32,
    },
}

impl RunnerError {
    /// Exit code of the obfuscator, when the failure carries one.
    #[must_use]
    pub const fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ProcessFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

/// Errors that arise from loading the TOML configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An I/O error occurred while reading the config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        /// Path to the file that could not be parsed.
        path: String,
        /// Underlying deserialization error.
        source: toml::de::Error,
    },
}
