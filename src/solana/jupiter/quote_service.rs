use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

use crate::entity::{Quote, QuoteRequest, SwapError};
use crate::solana::jupiter::models::{ErrorResponse, QuoteAmounts};
use crate::solana::jupiter::Config;

/// Service for obtaining swap quotes
#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, SwapError>;
}

pub struct JupiterQuoteService {
    http_client: Client,
    config: Config,
}

impl JupiterQuoteService {
    pub fn new(http_client: Client, config: Config) -> Self {
        Self {
            http_client,
            config,
        }
    }
}

/// Reject error bodies, then read the output amount out of the quote.
fn parse_quote(value: serde_json::Value) -> Result<Quote, SwapError> {
    if let Ok(ErrorResponse { error }) = serde_json::from_value::<ErrorResponse>(value.clone()) {
        return Err(SwapError::QuoteUnavailable(format!("Jupiter API error: {}", error)));
    }

    let amounts: QuoteAmounts = serde_json::from_value(value.clone())
        .map_err(|e| SwapError::QuoteUnavailable(format!("malformed quote: {}", e)))?;

    Ok(Quote {
        payload: value,
        out_amount: amounts.out_amount,
    })
}

#[async_trait]
impl QuoteService for JupiterQuoteService {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<Quote, SwapError> {
        debug!("Requesting quote with parameters: {:?}", request);

        let response = self
            .http_client
            .get(self.config.quote_url())
            .query(&[
                ("inputMint", request.input_mint.clone()),
                ("outputMint", request.output_mint.clone()),
                ("amount", request.amount.to_string()),
                ("slippageBps", request.slippage_bps.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SwapError::QuoteUnavailable(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SwapError::QuoteUnavailable(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let json_value = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| SwapError::QuoteUnavailable(format!("failed to parse response as JSON: {}", e)))?;

        let quote = parse_quote(json_value)?;

        info!(
            "Quote received successfully: input_amount={}, output_amount={}",
            request.amount, quote.out_amount
        );

        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    const SOL: &str = "So11111111111111111111111111111111111111112";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn service(server: &mockito::ServerGuard) -> JupiterQuoteService {
        JupiterQuoteService::new(
            Client::new(),
            Config {
                quote_api_url: server.url(),
                ..Config::default()
            },
        )
    }

    fn request() -> QuoteRequest {
        QuoteRequest {
            input_mint: SOL.to_string(),
            output_mint: USDC.to_string(),
            amount: 1_500_000_000,
            slippage_bps: 50,
        }
    }

    #[tokio::test]
    async fn sends_base_units_and_keeps_payload_opaque() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "inputMint": SOL,
            "outputMint": USDC,
            "inAmount": "1500000000",
            "outAmount": "50000000",
            "otherAmountThreshold": "49750000",
            "slippageBps": 50,
            "routePlan": [{ "percent": 100, "swapInfo": { "label": "Whirlpool" } }]
        });
        let mock = server
            .mock("GET", "/quote")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("inputMint".into(), SOL.into()),
                Matcher::UrlEncoded("outputMint".into(), USDC.into()),
                Matcher::UrlEncoded("amount".into(), "1500000000".into()),
                Matcher::UrlEncoded("slippageBps".into(), "50".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let quote = service(&server).get_quote(&request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(quote.out_amount, 50_000_000);
        assert_eq!(quote.payload, body);
    }

    #[tokio::test]
    async fn non_success_status_is_quote_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("{\"error\":\"Could not find any route\"}")
            .create_async()
            .await;

        let result = service(&server).get_quote(&request()).await;

        assert!(matches!(result, Err(SwapError::QuoteUnavailable(msg)) if msg.contains("400")));
    }

    #[tokio::test]
    async fn error_body_with_success_status_is_quote_unavailable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .match_query(Matcher::Any)
            .with_body("{\"error\":\"Token not tradable\"}")
            .create_async()
            .await;

        let result = service(&server).get_quote(&request()).await;

        assert!(
            matches!(result, Err(SwapError::QuoteUnavailable(msg)) if msg.contains("Token not tradable"))
        );
    }

    #[tokio::test]
    async fn quote_without_output_amount_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .match_query(Matcher::Any)
            .with_body("{\"inAmount\":\"1500000000\"}")
            .create_async()
            .await;

        let result = service(&server).get_quote(&request()).await;

        assert!(matches!(result, Err(SwapError::QuoteUnavailable(_))));
    }
}
