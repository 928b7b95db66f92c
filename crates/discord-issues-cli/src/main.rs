use anyhow::{Context, Result};
use clap::Parser;
use discord_issues_cli::{init_tracing, load_dotenv, run_bridge, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = load_dotenv().context("failed to load .env file")?;
    init_tracing();
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }
    let cli = Cli::parse();
    run_bridge(cli).await
}
