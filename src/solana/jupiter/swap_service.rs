use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use solana_sdk::pubkey::Pubkey;

use crate::entity::{Quote, SwapError, SwapTransaction};
use crate::solana::jupiter::models::{PrioritizationFeeLamports, SwapRequest, SwapResponse};
use crate::solana::jupiter::Config;

/// Service that turns a quote into an unsigned swap transaction
#[async_trait]
pub trait SwapService: Send + Sync {
    async fn build_swap_transaction(
        &self,
        quote: &Quote,
        user_public_key: &Pubkey,
    ) -> Result<SwapTransaction, SwapError>;
}

pub struct JupiterSwapService {
    http_client: Client,
    config: Config,
}

impl JupiterSwapService {
    pub fn new(http_client: Client, config: Config) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

#[async_trait]
impl SwapService for JupiterSwapService {
    async fn build_swap_transaction(
        &self,
        quote: &Quote,
        user_public_key: &Pubkey,
    ) -> Result<SwapTransaction, SwapError> {
        let swap_request = SwapRequest {
            quote_response: &quote.payload,
            user_public_key: user_public_key.to_string(),
            dynamic_compute_unit_limit: true,
            prioritization_fee_lamports: PrioritizationFeeLamports::PriorityLevelWithMaxLamports {
                priority_level: self.config.priority_level.clone(),
                max_lamports: self.config.priority_max_lamports,
            }
            .into(),
        };

        debug!(
            "Requesting swap transaction with user_public_key: {}",
            user_public_key
        );

        let response = self
            .http_client
            .post(self.config.swap_url())
            .json(&swap_request)
            .send()
            .await
            .map_err(|e| SwapError::SwapBuildFailed(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SwapError::SwapBuildFailed(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let swap_response: SwapResponse = response
            .json()
            .await
            .map_err(|e| SwapError::SwapBuildFailed(format!("failed to parse swap response: {}", e)))?;

        info!(
            "Swap transaction received: tx_length={}, last_valid_block_height={}",
            swap_response.swap_transaction.len(),
            swap_response.last_valid_block_height
        );

        Ok(SwapTransaction {
            transaction_base64: swap_response.swap_transaction,
            last_valid_block_height: swap_response.last_valid_block_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn service(server: &mockito::ServerGuard) -> JupiterSwapService {
        JupiterSwapService::new(
            Client::new(),
            Config {
                quote_api_url: server.url(),
                ..Config::default()
            },
        )
    }

    fn quote() -> Quote {
        Quote {
            payload: json!({
                "inAmount": "1500000000",
                "outAmount": "50000000",
                "routePlan": [{ "percent": 100 }],
                "contextSlot": 312345678
            }),
            out_amount: 50_000_000,
        }
    }

    #[tokio::test]
    async fn posts_quote_untouched_with_fee_options() {
        let mut server = mockito::Server::new_async().await;
        let user = Pubkey::new_unique();
        let quote = quote();
        let mock = server
            .mock("POST", "/swap")
            .match_body(Matcher::Json(json!({
                "quoteResponse": quote.payload.clone(),
                "userPublicKey": user.to_string(),
                "dynamicComputeUnitLimit": true,
                "prioritizationFeeLamports": {
                    "priorityLevelWithMaxLamports": {
                        "maxLamports": 1_000_000,
                        "priorityLevel": "veryHigh"
                    }
                }
            })))
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "swapTransaction": "AQID",
                    "lastValidBlockHeight": 279_632_475u64,
                    "prioritizationFeeLamports": 9_999
                })
                .to_string(),
            )
            .create_async()
            .await;

        let transaction = service(&server)
            .build_swap_transaction(&quote, &user)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            transaction,
            SwapTransaction {
                transaction_base64: "AQID".to_string(),
                last_valid_block_height: 279_632_475,
            }
        );
    }

    #[tokio::test]
    async fn non_success_status_is_swap_build_failed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/swap")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let result = service(&server)
            .build_swap_transaction(&quote(), &Pubkey::new_unique())
            .await;

        assert!(matches!(result, Err(SwapError::SwapBuildFailed(msg)) if msg.contains("500")));
    }
}
