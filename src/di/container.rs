use anyhow::{Context, Result};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::interactor::SwapInteractorImpl;
use crate::solana::jupiter::quote_service::{JupiterQuoteService, QuoteService};
use crate::solana::jupiter::swap_service::{JupiterSwapService, SwapService};
use crate::solana::jupiter::token_repository::{JupiterTokenRepository, TokenRepository};
use crate::solana::{
    create_solana_client, keypair_from_base58, parse_pubkey, KeypairWallet, NetworkClient,
    RpcNetworkClient, WalletSigner, WatchOnlyWallet,
};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    wallet: Arc<dyn WalletSigner>,
    swap_interactor: Arc<SwapInteractorImpl>,
}

impl ServiceContainer {
    /// Wire every service from validated configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let jupiter_config = config.jupiter_config();
        let settings = config.swap_settings()?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let solana_client =
            create_solana_client(&config.rpc_url).context("Failed to create Solana client")?;

        // Initialize repositories and services
        let token_repository: Arc<dyn TokenRepository> = Arc::new(JupiterTokenRepository::new(
            http_client.clone(),
            jupiter_config.clone(),
        ));
        let quote_service: Arc<dyn QuoteService> = Arc::new(JupiterQuoteService::new(
            http_client.clone(),
            jupiter_config.clone(),
        ));
        let swap_service: Arc<dyn SwapService> =
            Arc::new(JupiterSwapService::new(http_client, jupiter_config));
        let network: Arc<dyn NetworkClient> = Arc::new(RpcNetworkClient::new(
            solana_client,
            Duration::from_secs(config.broadcast_timeout_secs),
            Duration::from_secs(config.confirm_timeout_secs),
        ));

        let swap_interactor = Arc::new(SwapInteractorImpl::new(
            token_repository,
            quote_service,
            swap_service,
            network,
            settings,
        ));

        let wallet = Self::load_wallet(config)?;

        Ok(Self {
            wallet,
            swap_interactor,
        })
    }

    fn load_wallet(config: &AppConfig) -> Result<Arc<dyn WalletSigner>> {
        if let Some(keypair) = config.wallet_keypair.as_deref() {
            let wallet = KeypairWallet::new(
                keypair_from_base58(keypair).context("Invalid SWAP_WALLET_KEYPAIR")?,
            );
            if let Some(address) = wallet.public_key() {
                info!("Wallet connected: {}", address);
            }
            return Ok(Arc::new(wallet));
        }

        if let Some(address) = config.wallet_address.as_deref() {
            let address = parse_pubkey(address).context("Invalid SWAP_WALLET_ADDRESS")?;
            warn!("Watch-only wallet {}: swaps cannot be signed", address);
            return Ok(Arc::new(WatchOnlyWallet::new(address)));
        }

        warn!("No wallet configured; quotes only");
        Ok(Arc::new(KeypairWallet::disconnected()))
    }

    // Accessor methods

    pub fn wallet(&self) -> Arc<dyn WalletSigner> {
        self.wallet.clone()
    }

    pub fn swap_interactor(&self) -> Arc<SwapInteractorImpl> {
        self.swap_interactor.clone()
    }
}
