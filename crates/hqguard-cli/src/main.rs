//! CLI entry point - the composition root.
//!
//! stdout carries only what a shell should `eval`; logs go to stderr.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hqguard_cli::{Cli, CliError, Commands, bootstrap, handlers};

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let ctx = bootstrap(&cli)?;

    let code = match cli.command.unwrap_or(Commands::Ensure) {
        Commands::Ensure => handlers::ensure::execute(&ctx, cli.format).await?,
        Commands::Status => handlers::status::execute(&ctx).await?,
        Commands::Stop => handlers::stop::execute(&ctx).await?,
        Commands::Env => handlers::env::execute(&ctx, cli.format)?,
        Commands::Exec { command } => handlers::exec::execute(&ctx, &command).await?,
        Commands::Paths => handlers::paths::execute(&ctx)?,
    };

    Ok(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("hqguard: {err:#}");
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}
