use clap::Parser;
use std::io;
use std::process::ExitCode;
use stubgen::cli::{Cli, exit_code, normalize_args, run_cli, usage_message};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // stdout carries generated code, logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    match run_cli(cli, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match usage_message(&err) {
                Some(message) => eprint!("{message}"),
                None => error!("{err:#}"),
            }
            ExitCode::from(exit_code(&err))
        }
    }
}
