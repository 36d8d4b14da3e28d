//! `eazfuscator-runner` binary: parse arguments, set up logging, dispatch.
use std::process::ExitCode;

use clap::Parser;

use eazfuscator_runner::cli::{Cli, Command};
use eazfuscator_runner::commands;
use eazfuscator_runner::logging::{Logger, init_subscriber};

fn main() -> ExitCode {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    init_subscriber(args.verbose);
    let log = Logger::new();

    let result = match args.command {
        Command::Obfuscate(opts) => commands::obfuscate::run(&opts, &log),
        Command::Version => {
            commands::version::run();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log.error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
