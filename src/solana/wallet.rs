use anyhow::{anyhow, Result};
use async_trait::async_trait;
use solana_sdk::{
    pubkey::Pubkey, signature::Keypair, signer::Signer, transaction::VersionedTransaction,
};
use std::str::FromStr;

use crate::entity::SwapError;

/// Wallet session able to sign swap transactions.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Connected identity, `None` while no wallet session is active.
    fn public_key(&self) -> Option<Pubkey>;

    /// Sign `transaction` as its fee payer.
    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SwapError>;
}

/// Wallet backed by a local keypair.
pub struct KeypairWallet {
    keypair: Option<Keypair>,
}

impl KeypairWallet {
    pub fn new(keypair: Keypair) -> Self {
        Self {
            keypair: Some(keypair),
        }
    }

    pub fn disconnected() -> Self {
        Self { keypair: None }
    }
}

#[async_trait]
impl WalletSigner for KeypairWallet {
    fn public_key(&self) -> Option<Pubkey> {
        self.keypair.as_ref().map(|keypair| keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SwapError> {
        let keypair = self
            .keypair
            .as_ref()
            .ok_or_else(|| SwapError::SigningUnsupported("no keypair loaded".to_string()))?;

        VersionedTransaction::try_new(transaction.message, &[keypair])
            .map_err(|e| SwapError::SigningUnsupported(format!("failed to sign transaction: {}", e)))
    }
}

/// Public key only; can build swaps but never sign them.
pub struct WatchOnlyWallet {
    address: Pubkey,
}

impl WatchOnlyWallet {
    pub fn new(address: Pubkey) -> Self {
        Self { address }
    }
}

#[async_trait]
impl WalletSigner for WatchOnlyWallet {
    fn public_key(&self) -> Option<Pubkey> {
        Some(self.address)
    }

    async fn sign_transaction(
        &self,
        _transaction: VersionedTransaction,
    ) -> Result<VersionedTransaction, SwapError> {
        Err(SwapError::SigningUnsupported(format!(
            "{} is a watch-only wallet",
            self.address
        )))
    }
}

/// Restore Keypair from base58 string (64 bytes).
pub fn keypair_from_base58(keypair_base58: &str) -> Result<Keypair> {
    let keypair_bytes = bs58::decode(keypair_base58.trim())
        .into_vec()
        .map_err(|e| anyhow!("Failed to decode base58 keypair: {}", e))?;

    if keypair_bytes.len() != 64 {
        return Err(anyhow!("Invalid keypair length: {}", keypair_bytes.len()));
    }

    let keypair = Keypair::from_bytes(&keypair_bytes)
        .map_err(|e| anyhow!("Failed to create keypair from bytes: {}", e))?;

    Ok(keypair)
}

/// Convert base58 string to Solana `Pubkey`.
pub fn parse_pubkey(address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address.trim()).map_err(|e| anyhow!("Invalid Solana address: {}", e))
}
