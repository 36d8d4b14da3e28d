//! Build automation runner for the Eazfuscator.NET obfuscator.
//!
//! Turns a typed [`settings::ObfuscatorSettings`] record into the
//! obfuscator's command line, locates `Eazfuscator.Net.exe`, runs it and
//! classifies the outcome.
//!
//! - **[`arguments`]**: settings to ordered, quoted command-line tokens
//! - **[`locator`]**: explicit path, search directories, then `PATH`
//! - **[`runner`]**: validate, resolve, spawn, wait, classify
//! - **[`config`]** and **[`cli`]**: the `eazfuscator-runner` binary's inputs
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod arguments;
pub mod cli;
pub mod commands;
pub mod config;
pub mod environment;
pub mod error;
pub mod exec;
pub mod locator;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod runner;
pub mod settings;

pub use arguments::{Argument, ProcessArguments, build_arguments};
pub use error::{ConfigError, RunnerError};
pub use runner::{EazfuscatorRunner, ExitInfo, Invocation};
pub use settings::ObfuscatorSettings;
