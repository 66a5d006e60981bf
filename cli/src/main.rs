use clap::Parser;
use colored::Colorize;
use domain::SupportBotError;
use infrastructure::config::Config;
use presentation::cli::{Cli, CliApp};
use shared::telemetry::init_tracing;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing("warn");
    let cli = Cli::parse();
    let mut app = CliApp::new(Config::load());
    match app.run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("{err:#}").red());
            ExitCode::from(exit_code(&err))
        }
    }
}

/// 2 when the corpus could not be served, 1 for anything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    let fatal = err
        .downcast_ref::<SupportBotError>()
        .is_some_and(SupportBotError::is_fatal);
    if fatal {
        2
    } else {
        1
    }
}
