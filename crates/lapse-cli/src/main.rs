//! Lapse daemon - runs the TTL janitor against the configured stores.

use clap::Parser;
use lapse_cli::{commands, Cli, Command, LapseConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. An explicit `--log-level` wins over RUST_LOG; the default
/// is `info`.
fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

async fn run(cli: Cli) -> lapse_cli::Result<()> {
    let config = LapseConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => commands::execute_run(&config).await?,
        Command::SweepOnce => {
            let metrics = commands::execute_sweep_once(&config).await?;
            println!("{}", metrics.summary());
        }
        Command::ShowConfig => print!("{}", config.to_toml()?),
    }

    Ok(())
}
