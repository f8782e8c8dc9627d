use clap::Parser;
use tracing_subscriber::EnvFilter;

use papersift_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let Commands::Run(args) = cli.command;

    // --debug wins over RUST_LOG
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    papersift_cli::run(args, |key| std::env::var(key).ok()).await
}
