mod cli;
mod config;
mod error;
mod model;
mod numbering;
mod providers;
mod runner;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use error::NumberingError;
use providers::clickup::ClickUpProvider;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if is_api_error(&err) {
                eprintln!("Error communicating with ClickUp API: {err:#}");
            } else {
                eprintln!("Unexpected error: {err:#}");
            }
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = config::load_config(&config_path)?;

    let token = config.resolve_token(cli.api_token)?;
    let provider = ClickUpProvider::new(token, config.base_url());
    let opts = cli.command.run_options(&config);

    let mut stdout = io::stdout().lock();
    runner::run(&provider, &opts, &mut stdout).await?;
    Ok(())
}

/// RUST_LOG wins; otherwise -v/-vv raise the default `warn` level.
fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tasknum={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn is_api_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<reqwest::Error>()
            || matches!(
                cause.downcast_ref::<NumberingError>(),
                Some(NumberingError::Api { .. })
            )
    })
}
