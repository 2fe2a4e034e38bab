mod check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mtgprice-cli")]
#[command(about = "Compare card prices across configured stores")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the stores in the registry
    Stores,
    /// Price every card in a list at the selected stores
    Check {
        /// File with one card per line (`4x Sol Ring` style quantities allowed)
        #[arg(long, short)]
        input: PathBuf,

        /// Store id to query; repeat for several. Defaults to every store.
        #[arg(long = "store")]
        stores: Vec<String>,

        /// Print the full report as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = mtgprice_core::load_app_config()?;
    init_tracing(&config.log_level)?;

    match cli.command {
        Commands::Stores => check::run_stores(&config)?,
        Commands::Check {
            input,
            stores,
            json,
        } => check::run_check(&config, &input, stores, json).await?,
    }

    Ok(())
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
