use base64::{engine::general_purpose::STANDARD, Engine as _};
use solana_sdk::transaction::VersionedTransaction;

use crate::entity::SwapError;

/// Decode a base64 `VersionedTransaction` received from the swap-build service.
///
/// The bytes come from an untrusted hop and are never retried or repaired.
pub fn decode_swap_transaction(transaction_base64: &str) -> Result<VersionedTransaction, SwapError> {
    let bytes = STANDARD
        .decode(transaction_base64.trim())
        .map_err(|e| SwapError::MalformedTransaction(format!("invalid base64: {}", e)))?;

    let transaction: VersionedTransaction = bincode::deserialize(&bytes).map_err(|e| {
        SwapError::MalformedTransaction(format!("failed to deserialize transaction: {}", e))
    })?;

    if transaction.message.header().num_required_signatures == 0 {
        return Err(SwapError::MalformedTransaction(
            "transaction requires no signatures".to_string(),
        ));
    }

    Ok(transaction)
}

/// Base64-encode a transaction the way the swap-build service does.
pub fn encode_transaction(transaction: &VersionedTransaction) -> Result<String, SwapError> {
    let bytes = bincode::serialize(transaction)
        .map_err(|e| SwapError::MalformedTransaction(format!("failed to serialize: {}", e)))?;

    Ok(STANDARD.encode(bytes))
}
