//! Duplex Recorder CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use duplex_recorder::cli::{
    app::{run_devices, run_interactive, run_record, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use duplex_recorder::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config { action }) => {
            let presenter = Presenter::new();
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Some(Commands::Devices) => run_devices(),
        Some(Commands::Record(args)) => run_record(args).await,
        None => run_interactive().await,
    }
}

/// Diagnostics go to stderr; `RUST_LOG` overrides the default `warn` level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
