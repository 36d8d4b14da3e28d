//! Command: print version information.

/// The runner version: set by the build script, or the package version.
#[must_use]
pub const fn version() -> &'static str {
    match option_env!("EAZFUSCATOR_RUNNER_VERSION") {
        Some(version) => version,
        None => env!("CARGO_PKG_VERSION"),
    }
}

/// Print the runner version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("eazfuscator-runner {}", version());
}
