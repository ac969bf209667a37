/// Jupiter endpoints and swap-build options
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the token list
    pub token_list_url: String,

    /// Base URL for the quote and swap APIs
    pub quote_api_url: String,

    /// Priority level requested for the swap transaction
    pub priority_level: String,

    /// Upper bound on the priority fee
    pub priority_max_lamports: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token_list_url: "https://token.jup.ag/strict".to_string(),
            quote_api_url: "https://quote-api.jup.ag/v6".to_string(),
            priority_level: "veryHigh".to_string(),
            priority_max_lamports: 1_000_000,
        }
    }
}

impl Config {
    pub fn quote_url(&self) -> String {
        format!("{}/quote", self.quote_api_url.trim_end_matches('/'))
    }

    pub fn swap_url(&self) -> String {
        format!("{}/swap", self.quote_api_url.trim_end_matches('/'))
    }
}
