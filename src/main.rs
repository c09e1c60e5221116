use clap::Parser;
use diffy::app;
use diffy::cli::Cli;
use diffy::constant::{EXIT_DIFFERENT, EXIT_SAME, EXIT_TROUBLE};
use std::process::ExitCode;
use tracing::Level;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match app::run(cli) {
        Ok(false) => ExitCode::from(EXIT_SAME),
        Ok(true) => ExitCode::from(EXIT_DIFFERENT),
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(EXIT_TROUBLE)
        }
    }
}
