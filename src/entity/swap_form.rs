/// Values the user has entered but not yet quoted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapForm {
    pub input_mint: Option<String>,
    pub output_mint: Option<String>,
    pub amount: String,
    pub slippage_bps: u16,
}

impl SwapForm {
    pub fn new(slippage_bps: u16) -> Self {
        Self {
            slippage_bps,
            ..Self::default()
        }
    }
}
