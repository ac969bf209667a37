use rust_decimal::Decimal;
use solana_sdk::signature::Signature;

#[derive(Debug, Clone)]
pub struct SwapResult {
    pub signature: Signature,
    pub confirmed: bool,
    pub error: Option<String>,
    pub input_symbol: String,
    pub output_symbol: String,
    pub amount_in: Decimal,
    /// Quoted output; the executed amount may differ within slippage.
    pub amount_out: Decimal,
    pub explorer_url: String,
}
