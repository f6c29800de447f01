//! Drover CLI entry point.

use clap::Parser;
use std::process::ExitCode;

use drover::cli::{Cli, Commands};
use drover::infrastructure::logging::Logger;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Daemon-side subcommands set up file logging themselves once the
    // profile is loaded; the control commands log to stderr.
    let _logger = match &cli.command {
        Commands::Run | Commands::ExecTask { .. } => None,
        _ => Some(Logger::init_cli()),
    };

    let profile = cli.profile.clone();
    let config = cli.config.clone();

    let result = match cli.command {
        Commands::Start => {
            drover::cli::commands::start::execute(&profile, config.as_deref(), cli.json)
                .await
                .map(|()| ExitCode::SUCCESS)
        }
        Commands::Stop => {
            drover::cli::commands::stop::execute(&profile, config.as_deref(), cli.json)
                .await
                .map(|()| ExitCode::SUCCESS)
        }
        Commands::Status => {
            drover::cli::commands::status::execute(&profile, config.as_deref(), cli.json)
                .await
                .map(|()| ExitCode::SUCCESS)
        }
        Commands::Queue(command) => {
            drover::cli::commands::queue::execute(command, &profile, config.as_deref(), cli.json)
                .await
                .map(|()| ExitCode::SUCCESS)
        }
        Commands::Run => drover::cli::commands::run::execute(&profile, config.as_deref())
            .await
            .map(|()| ExitCode::SUCCESS),
        Commands::ExecTask { id } => {
            drover::cli::commands::exec_task::execute(&profile, config.as_deref(), id).await
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            drover::cli::handle_error(&err, cli.json);
            ExitCode::FAILURE
        }
    }
}
