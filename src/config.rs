use anyhow::{anyhow, Context, Result};
use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, Environment};
use serde::Deserialize;
use solana_sdk::commitment_config::CommitmentConfig;
use std::time::Duration;

use crate::interactor::SwapSettings;
use crate::solana::jupiter::Config as JupiterConfig;
use crate::solana::SendOptions;
use crate::utils::MAX_SLIPPAGE_BPS;

/// Upper bound on broadcast attempts.
pub const MAX_BROADCAST_RETRIES: usize = 3;

/// Application settings, read from `SWAP_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub rpc_url: String,
    pub token_list_url: String,
    pub quote_api_url: String,
    pub explorer_tx_url: String,
    pub default_slippage_bps: u16,
    pub quote_max_age_secs: u64,
    pub http_timeout_secs: u64,
    pub broadcast_max_retries: usize,
    pub skip_preflight: bool,
    pub broadcast_timeout_secs: u64,
    pub confirm_timeout_secs: u64,
    pub commitment: String,
    pub priority_level: String,
    pub priority_max_lamports: u64,
    /// Base58 64-byte keypair; enables signing.
    pub wallet_keypair: Option<String>,
    /// Address for a watch-only session when no keypair is given.
    pub wallet_address: Option<String>,
}

impl AppConfig {
    /// Load from the environment (and `.env`, if the caller loaded it).
    pub fn from_env() -> Result<Self> {
        let builder =
            Self::defaults()?.add_source(Environment::with_prefix("SWAP").try_parsing(true));
        Self::build(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let jupiter = JupiterConfig::default();

        let builder = ::config::Config::builder()
            .set_default("rpc_url", "https://api.mainnet-beta.solana.com")?
            .set_default("token_list_url", jupiter.token_list_url)?
            .set_default("quote_api_url", jupiter.quote_api_url)?
            .set_default("explorer_tx_url", "https://solscan.io/tx")?
            .set_default("default_slippage_bps", 50)?
            .set_default("quote_max_age_secs", 20)?
            .set_default("http_timeout_secs", 15)?
            .set_default("broadcast_max_retries", 3)?
            .set_default("skip_preflight", false)?
            .set_default("broadcast_timeout_secs", 30)?
            .set_default("confirm_timeout_secs", 90)?
            .set_default("commitment", "confirmed")?
            .set_default("priority_level", jupiter.priority_level)?
            .set_default("priority_max_lamports", jupiter.priority_max_lamports as i64)?;

        Ok(builder)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: AppConfig = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SLIPPAGE_BPS).contains(&self.default_slippage_bps) {
            return Err(anyhow!(
                "default_slippage_bps must be between 1 and {}",
                MAX_SLIPPAGE_BPS
            ));
        }
        if !(1..=MAX_BROADCAST_RETRIES).contains(&self.broadcast_max_retries) {
            return Err(anyhow!(
                "broadcast_max_retries must be between 1 and {}",
                MAX_BROADCAST_RETRIES
            ));
        }
        if self.quote_max_age_secs == 0 {
            return Err(anyhow!("quote_max_age_secs must be positive"));
        }
        for (name, url) in [
            ("rpc_url", &self.rpc_url),
            ("token_list_url", &self.token_list_url),
            ("quote_api_url", &self.quote_api_url),
        ] {
            if url.trim().is_empty() {
                return Err(anyhow!("{} must not be empty", name));
            }
        }
        self.commitment_config()?;

        Ok(())
    }

    /// Only `confirmed` and `finalized` are accepted; `processed` can be
    /// rolled back.
    pub fn commitment_config(&self) -> Result<CommitmentConfig> {
        match self.commitment.trim().to_lowercase().as_str() {
            "confirmed" => Ok(CommitmentConfig::confirmed()),
            "finalized" => Ok(CommitmentConfig::finalized()),
            other => Err(anyhow!(
                "Unsupported commitment '{}', use 'confirmed' or 'finalized'",
                other
            )),
        }
    }

    pub fn jupiter_config(&self) -> JupiterConfig {
        JupiterConfig {
            token_list_url: self.token_list_url.clone(),
            quote_api_url: self.quote_api_url.clone(),
            priority_level: self.priority_level.clone(),
            priority_max_lamports: self.priority_max_lamports,
        }
    }

    pub fn swap_settings(&self) -> Result<SwapSettings> {
        Ok(SwapSettings {
            quote_max_age: Duration::from_secs(self.quote_max_age_secs),
            send_options: SendOptions {
                skip_preflight: self.skip_preflight,
                max_retries: self.broadcast_max_retries,
            },
            commitment: self.commitment_config()?,
            explorer_tx_url: self.explorer_tx_url.clone(),
            default_slippage_bps: self.default_slippage_bps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(overrides: &[(&str, &str)]) -> Result<AppConfig> {
        let mut builder = AppConfig::defaults()?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        AppConfig::build(builder)
    }

    #[test]
    fn defaults_match_jupiter_and_mainnet() {
        let config = load(&[]).unwrap();

        assert_eq!(config.rpc_url, "https://api.mainnet-beta.solana.com");
        assert_eq!(config.token_list_url, "https://token.jup.ag/strict");
        assert_eq!(config.default_slippage_bps, 50);
        assert_eq!(config.broadcast_max_retries, 3);
        assert!(!config.skip_preflight);
        assert!(config.wallet_keypair.is_none());

        let settings = config.swap_settings().unwrap();
        assert_eq!(settings.quote_max_age, Duration::from_secs(20));
        assert_eq!(settings.commitment, CommitmentConfig::confirmed());
        assert_eq!(settings.send_options, SendOptions::default());
    }

    #[test]
    fn finalized_commitment_is_accepted() {
        let config = load(&[("commitment", "finalized")]).unwrap();

        assert_eq!(
            config.commitment_config().unwrap(),
            CommitmentConfig::finalized()
        );
    }

    #[test]
    fn rejects_weak_commitment_and_out_of_range_values() {
        assert!(load(&[("commitment", "processed")]).is_err());
        assert!(load(&[("broadcast_max_retries", "5")]).is_err());
        assert!(load(&[("broadcast_max_retries", "0")]).is_err());
        assert!(load(&[("default_slippage_bps", "0")]).is_err());
        assert!(load(&[("quote_api_url", "  ")]).is_err());
    }
}
