//! Solana swap terminal - Main executable
//!
//! Interactive terminal client that quotes token swaps through the Jupiter
//! aggregator, signs them with a local keypair and follows them to
//! confirmation on Solana.
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};
use solana_swap_terminal::{create_application, AppConfig, Router, SwapInteractor};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting Solana swap terminal v{}", solana_swap_terminal::VERSION);

    // Load and validate configuration
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!("Using RPC endpoint {}", config.rpc_url);

    let (router, services) =
        create_application(&config).context("Failed to initialize application")?;

    // The token list is needed before any selection can be made
    info!("Loading token list...");
    match services.swap_interactor().fetch_catalog().await {
        Ok(catalog) => info!("Token list loaded: {} tokens", catalog.len()),
        Err(e) => error!("Failed to load token list: {} (use 'refresh' to retry)", e),
    }

    router.run().await?;

    Ok(())
}
