use std::process::ExitCode;

use clap::Parser;
use pertcast::commands::base_commands::CliArgs;
use pertcast::commands::run_command;
use pertcast::logging::init_tracing;

fn main() -> ExitCode {
    init_tracing();
    let args = CliArgs::parse();
    let action = args.command.action();
    match run_command(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Failed to {action}: {e}");
            ExitCode::FAILURE
        }
    }
}
