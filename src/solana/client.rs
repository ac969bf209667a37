use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;
use solana_transaction_status::UiTransactionEncoding;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::entity::SwapError;

const INITIAL_POLL_DELAY_MS: u64 = 500;
const MAX_POLL_DELAY_MS: u64 = 2_000;
const POLL_BACKOFF_MULTIPLIER: f64 = 1.5;
const RESEND_DELAY_MS: u64 = 500;

/// Create a Solana client with confirmed commitment
pub fn create_solana_client(rpc_url: &str) -> Result<Arc<RpcClient>> {
    let client = RpcClient::new_with_commitment(rpc_url.to_string(), CommitmentConfig::confirmed());

    Ok(Arc::new(client))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Opt-in only: skipping preflight lets invalid transactions pay fees.
    pub skip_preflight: bool,
    pub max_retries: usize,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub signature: Signature,
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

/// Final ledger status of a confirmed signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfirmationStatus {
    pub err: Option<String>,
}

/// Broadcast and confirmation side of the network.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    async fn send_raw_transaction(
        &self,
        transaction: &VersionedTransaction,
        options: SendOptions,
    ) -> Result<Signature, SwapError>;

    /// Wait until `request.signature` reaches `commitment`, the blockhash
    /// expires, or the polling budget runs out.
    async fn confirm_transaction(
        &self,
        request: &ConfirmationRequest,
        commitment: CommitmentConfig,
    ) -> Result<ConfirmationStatus, SwapError>;
}

pub struct RpcNetworkClient {
    client: Arc<RpcClient>,
    broadcast_timeout: Duration,
    confirm_timeout: Duration,
}

impl RpcNetworkClient {
    pub fn new(client: Arc<RpcClient>, broadcast_timeout: Duration, confirm_timeout: Duration) -> Self {
        Self {
            client,
            broadcast_timeout,
            confirm_timeout,
        }
    }

    async fn send_with_retries(
        &self,
        transaction: &VersionedTransaction,
        signature: Signature,
        options: SendOptions,
    ) -> Result<Signature, SwapError> {
        let attempts = options.max_retries.max(1);
        // Once an attempt may have reached a node, a later rejection cannot
        // rule out that the first copy executed.
        let mut reached_node = false;

        let mut attempt = 1;
        loop {
            let config = RpcSendTransactionConfig {
                skip_preflight: options.skip_preflight,
                preflight_commitment: Some(self.client.commitment().commitment),
                encoding: Some(UiTransactionEncoding::Base64),
                max_retries: Some(options.max_retries),
                ..RpcSendTransactionConfig::default()
            };

            match self
                .client
                .send_transaction_with_config(transaction, config)
                .await
            {
                Ok(sent) => return Ok(sent),
                Err(e) => {
                    let transport = is_transport_error(&e);
                    reached_node |= transport;

                    if transport && attempt < attempts {
                        warn!(
                            "Broadcast attempt {}/{} for {} failed: {}",
                            attempt, attempts, signature, e
                        );
                        attempt += 1;
                        sleep(Duration::from_millis(RESEND_DELAY_MS)).await;
                        continue;
                    }

                    return Err(SwapError::BroadcastFailed {
                        signature,
                        transport: reached_node,
                        detail: e.to_string(),
                    });
                }
            }
        }
    }

    async fn poll_confirmation(
        &self,
        request: &ConfirmationRequest,
        commitment: CommitmentConfig,
    ) -> Result<ConfirmationStatus, SwapError> {
        let mut delay = Duration::from_millis(INITIAL_POLL_DELAY_MS);

        loop {
            match self.client.get_signature_statuses(&[request.signature]).await {
                Ok(response) => {
                    if let Some(Some(status)) = response.value.into_iter().next() {
                        if let Some(err) = &status.err {
                            return Ok(ConfirmationStatus {
                                err: Some(err.to_string()),
                            });
                        }
                        if status.satisfies_commitment(commitment) {
                            info!(
                                "Transaction {} confirmed in slot {}",
                                request.signature, status.slot
                            );
                            return Ok(ConfirmationStatus::default());
                        }
                    } else {
                        // Not seen yet; it can only land while the blockhash is valid
                        match self.client.get_block_height_with_commitment(commitment).await {
                            Ok(height) if height > request.last_valid_block_height => {
                                return Err(SwapError::TransactionExpired {
                                    signature: request.signature,
                                    last_valid_block_height: request.last_valid_block_height,
                                });
                            }
                            Ok(_) => {}
                            Err(e) => debug!("Block height lookup failed: {}", e),
                        }
                    }
                }
                Err(e) => {
                    // Transient error, continue polling
                    debug!("Signature status lookup for {} failed: {}", request.signature, e);
                }
            }

            sleep(delay).await;
            delay = Duration::from_millis(
                ((delay.as_millis() as f64 * POLL_BACKOFF_MULTIPLIER) as u64).min(MAX_POLL_DELAY_MS),
            );
        }
    }
}

#[async_trait]
impl NetworkClient for RpcNetworkClient {
    async fn send_raw_transaction(
        &self,
        transaction: &VersionedTransaction,
        options: SendOptions,
    ) -> Result<Signature, SwapError> {
        let signature = transaction.signatures.first().copied().unwrap_or_default();
        info!(
            "Broadcasting transaction {} (skip_preflight={}, max_retries={})",
            signature, options.skip_preflight, options.max_retries
        );

        match timeout(
            self.broadcast_timeout,
            self.send_with_retries(transaction, signature, options),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(SwapError::BroadcastTimeout {
                signature,
                elapsed: self.broadcast_timeout,
            }),
        }
    }

    async fn confirm_transaction(
        &self,
        request: &ConfirmationRequest,
        commitment: CommitmentConfig,
    ) -> Result<ConfirmationStatus, SwapError> {
        debug!(
            "Confirming {} (blockhash {}, last valid height {}, commitment {:?})",
            request.signature, request.blockhash, request.last_valid_block_height, commitment.commitment
        );

        // Bounds the RPC calls too, not only the sleeps between them
        match timeout(self.confirm_timeout, self.poll_confirmation(request, commitment)).await {
            Ok(result) => result,
            Err(_) => Err(SwapError::ConfirmationTimeout {
                signature: request.signature,
                elapsed: self.confirm_timeout,
            }),
        }
    }
}

/// Errors where the node may still have received the transaction.
fn is_transport_error(error: &ClientError) -> bool {
    matches!(
        error.kind(),
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_)
    )
}
