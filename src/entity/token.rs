use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub address: String, // Mint address
    pub symbol: String,  // Token symbol (e.g. "SOL", "USDC")
    pub name: String,    // Full token name
    pub decimals: u8,    // Base-unit exponent
}

/// In-memory token list, replaced as a whole on every refresh.
#[derive(Debug, Clone, Default)]
pub struct TokenCatalog {
    tokens: Vec<Token>,
    by_address: HashMap<String, usize>,
}

impl TokenCatalog {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut by_address = HashMap::with_capacity(tokens.len());
        for (index, token) in tokens.iter().enumerate() {
            // First occurrence wins if the list repeats a mint
            by_address.entry(token.address.clone()).or_insert(index);
        }

        Self { tokens, by_address }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, address: &str) -> Option<&Token> {
        self.by_address.get(address).map(|&index| &self.tokens[index])
    }

    /// Symbol or mint for display, falling back to a shortened address.
    pub fn label(&self, address: &str) -> String {
        self.get(address)
            .map(|token| token.symbol.clone())
            .unwrap_or_else(|| crate::utils::shorten_address(address))
    }

    /// Exact mint match first, then the first symbol match ignoring case.
    pub fn resolve(&self, query: &str) -> Option<&Token> {
        self.get(query).or_else(|| {
            self.tokens
                .iter()
                .find(|token| token.symbol.eq_ignore_ascii_case(query))
        })
    }

    /// Tokens whose symbol or address contains `query`, in catalog order.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Token> {
        let needle = query.to_lowercase();

        self.tokens
            .iter()
            .filter(|token| {
                token.symbol.to_lowercase().contains(&needle)
                    || token.address.to_lowercase().contains(&needle)
            })
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(address: &str, symbol: &str, decimals: u8) -> Token {
        Token {
            address: address.to_string(),
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            decimals,
        }
    }

    fn catalog() -> TokenCatalog {
        TokenCatalog::new(vec![
            token("So11111111111111111111111111111111111111112", "SOL", 9),
            token("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "USDC", 6),
            token("Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB", "USDT", 6),
            token("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "Bonk", 5),
        ])
    }

    #[test]
    fn search_matches_symbol_or_address_ignoring_case() {
        let catalog = catalog();

        let symbols: Vec<&str> = catalog
            .search("us", 50)
            .iter()
            .map(|token| token.symbol.as_str())
            .collect();
        assert_eq!(symbols, vec!["USDC", "USDT"]);

        let by_address = catalog.search("dezxaz", 50);
        assert_eq!(by_address.len(), 1);
        assert_eq!(by_address[0].symbol, "Bonk");
    }

    #[test]
    fn search_respects_limit_and_empty_query() {
        let catalog = catalog();

        assert_eq!(catalog.search("", 50).len(), 4);
        assert_eq!(catalog.search("", 2).len(), 2);
    }

    #[test]
    fn resolve_prefers_address_then_symbol() {
        let catalog = catalog();

        assert_eq!(catalog.resolve("bonk").map(|t| t.decimals), Some(5));
        assert_eq!(
            catalog
                .resolve("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v")
                .map(|t| t.symbol.as_str()),
            Some("USDC")
        );
        assert!(catalog.resolve("NOPE").is_none());
    }

    #[test]
    fn label_falls_back_to_short_address() {
        let catalog = catalog();

        assert_eq!(
            catalog.label("So11111111111111111111111111111111111111112"),
            "SOL"
        );
        assert_eq!(
            catalog.label("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU"),
            "7xKXt...sgAsU"
        );
    }
}
