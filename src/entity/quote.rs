use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Parameters a quote was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub input_mint: String,
    pub output_mint: String,
    pub amount: u64,
    pub slippage_bps: u16,
}

/// Quote as returned by the aggregator.
///
/// `payload` is passed back to the swap-build service untouched; only the
/// output amount is read out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub payload: serde_json::Value,
    pub out_amount: u64,
}

/// The quote currently offered to the user, with the request it answers.
#[derive(Debug, Clone)]
pub struct HeldQuote {
    pub request: QuoteRequest,
    pub quote: Quote,
    pub quoted_at: DateTime<Utc>,
    pub(crate) received_at: Instant,
    pub(crate) generation: u64,
}

impl HeldQuote {
    pub fn age(&self) -> Duration {
        self.received_at.elapsed()
    }

    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.age() > max_age
    }
}

/// Unsigned transaction produced by the swap-build service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapTransaction {
    /// Base64 of the bincode-serialized `VersionedTransaction`.
    pub transaction_base64: String,
    pub last_valid_block_height: u64,
}

/// Human-readable view of a held quote.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotePreview {
    pub input_symbol: String,
    pub output_symbol: String,
    pub in_amount: rust_decimal::Decimal,
    pub out_amount: rust_decimal::Decimal,
    /// Output tokens per one input token.
    pub rate: Option<rust_decimal::Decimal>,
    pub quoted_at: DateTime<Utc>,
}
