use cascade_search::server::run_server;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "cascade-search")]
#[command(about = "Cascade Search - Multi-Stage Document Retrieval Server")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_server(cli.config.as_deref()).await?;
    Ok(())
}
