use solana_sdk::signature::Signature;
use std::time::Duration;

/// Whether a failed attempt could have moved funds on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundsStatus {
    NotMoved,
    MayHaveMoved { signature: Signature },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SwapError {
    #[error("Token list unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Input and output tokens must be different")]
    SameToken,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Quote unavailable: {0}")]
    QuoteUnavailable(String),

    #[error("No quote available, request a quote first")]
    NoQuote,

    #[error("Quote is {age_secs}s old, request a fresh quote")]
    StaleQuote { age_secs: u64 },

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("A swap is already in progress")]
    SwapInProgress,

    #[error("Request superseded by a newer request")]
    Superseded,

    #[error("Failed to build swap transaction: {0}")]
    SwapBuildFailed(String),

    #[error("Malformed swap transaction: {0}")]
    MalformedTransaction(String),

    #[error("Transaction signing rejected: {0}")]
    SigningRejected(String),

    #[error("Wallet does not support signing transactions: {0}")]
    SigningUnsupported(String),

    #[error("Failed to broadcast transaction {signature}: {detail}")]
    BroadcastFailed {
        signature: Signature,
        detail: String,
        /// The node never answered, so it may still have received the bytes.
        transport: bool,
    },

    #[error("Broadcast of transaction {signature} timed out after {elapsed:?}")]
    BroadcastTimeout {
        signature: Signature,
        elapsed: Duration,
    },

    #[error("Transaction {signature} failed on-chain: {detail}")]
    ExecutionFailed { signature: Signature, detail: String },

    #[error("Transaction {signature} not confirmed within {elapsed:?}")]
    ConfirmationTimeout {
        signature: Signature,
        elapsed: Duration,
    },

    #[error("Transaction {signature} expired: block height passed {last_valid_block_height}")]
    TransactionExpired {
        signature: Signature,
        last_valid_block_height: u64,
    },
}

impl SwapError {
    pub fn funds_status(&self) -> FundsStatus {
        match self {
            SwapError::BroadcastFailed {
                signature,
                transport: true,
                ..
            }
            | SwapError::BroadcastTimeout { signature, .. }
            | SwapError::ExecutionFailed { signature, .. }
            | SwapError::ConfirmationTimeout { signature, .. } => FundsStatus::MayHaveMoved {
                signature: *signature,
            },
            _ => FundsStatus::NotMoved,
        }
    }

    /// Signature of the transaction this error refers to, once one exists.
    pub fn signature(&self) -> Option<&Signature> {
        match self {
            SwapError::BroadcastFailed { signature, .. }
            | SwapError::BroadcastTimeout { signature, .. }
            | SwapError::ExecutionFailed { signature, .. }
            | SwapError::ConfirmationTimeout { signature, .. }
            | SwapError::TransactionExpired { signature, .. } => Some(signature),
            _ => None,
        }
    }
}
