//! Top-level subcommand orchestration.
pub mod obfuscate;
pub mod version;
