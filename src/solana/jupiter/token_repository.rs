use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;

use crate::entity::{SwapError, Token};
use crate::solana::jupiter::{Config, JupiterToken};

/// Repository for the tradable token list
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Fetch the full token list in catalog order
    async fn get_tokens(&self) -> Result<Vec<Token>, SwapError>;
}

/// Implementation of the repository over the Jupiter token list
pub struct JupiterTokenRepository {
    http_client: Client,
    config: Config,
}

impl JupiterTokenRepository {
    pub fn new(http_client: Client, config: Config) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

#[async_trait]
impl TokenRepository for JupiterTokenRepository {
    async fn get_tokens(&self) -> Result<Vec<Token>, SwapError> {
        info!("Fetching token list from {}", self.config.token_list_url);

        let response = self
            .http_client
            .get(&self.config.token_list_url)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to fetch token list: {}", e);
                SwapError::CatalogUnavailable(format!("request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Jupiter API error [get_tokens]: {} {}", status, error_text);
            return Err(SwapError::CatalogUnavailable(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let jupiter_tokens: Vec<JupiterToken> = response.json().await.map_err(|e| {
            error!("Failed to parse token list: {}", e);
            SwapError::CatalogUnavailable(format!("failed to parse token list: {}", e))
        })?;

        let tokens: Vec<Token> = jupiter_tokens
            .into_iter()
            .map(|token| Token {
                address: token.address,
                symbol: token.symbol,
                name: token.name,
                decimals: token.decimals,
            })
            .collect();

        info!("Token list loaded: {} tokens", tokens.len());

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repository(server: &mockito::ServerGuard) -> JupiterTokenRepository {
        JupiterTokenRepository::new(
            Client::new(),
            Config {
                token_list_url: format!("{}/strict", server.url()),
                ..Config::default()
            },
        )
    }

    #[tokio::test]
    async fn parses_token_list_in_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/strict")
            .with_header("content-type", "application/json")
            .with_body(
                json!([
                    {
                        "address": "So11111111111111111111111111111111111111112",
                        "symbol": "SOL",
                        "name": "Wrapped SOL",
                        "decimals": 9,
                        "logoURI": "https://example.com/sol.png",
                        "tags": ["verified"]
                    },
                    {
                        "address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                        "symbol": "USDC",
                        "name": "USD Coin",
                        "decimals": 6
                    }
                ])
                .to_string(),
            )
            .create_async()
            .await;

        let tokens = repository(&server).get_tokens().await.unwrap();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].symbol, "SOL");
        assert_eq!(tokens[0].decimals, 9);
        assert_eq!(tokens[1].address, "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");
    }

    #[tokio::test]
    async fn server_error_is_catalog_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/strict")
            .with_status(503)
            .with_body("maintenance")
            .create_async()
            .await;

        let result = repository(&server).get_tokens().await;

        assert!(matches!(result, Err(SwapError::CatalogUnavailable(msg)) if msg.contains("maintenance")));
    }

    #[tokio::test]
    async fn malformed_body_is_catalog_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/strict")
            .with_body("{\"not\": \"a list\"}")
            .create_async()
            .await;

        let result = repository(&server).get_tokens().await;

        assert!(matches!(result, Err(SwapError::CatalogUnavailable(_))));
    }
}
