use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

use crate::entity::{
    HeldQuote, QuotePreview, QuoteRequest, SwapError, SwapForm, SwapResult, Token, TokenCatalog,
};
use crate::solana::jupiter::{QuoteService, SwapService, TokenRepository};
use crate::solana::{
    decode_swap_transaction, from_base_units, parse_human_amount, to_base_units,
    ConfirmationRequest, NetworkClient, SendOptions, WalletSigner,
};

/// Policy knobs for a swap attempt.
#[derive(Debug, Clone)]
pub struct SwapSettings {
    pub quote_max_age: Duration,
    pub send_options: SendOptions,
    /// `confirmed` trades a small reorg risk for speed; `finalized` waits
    /// for full finality.
    pub commitment: CommitmentConfig,
    pub explorer_tx_url: String,
    pub default_slippage_bps: u16,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            quote_max_age: Duration::from_secs(20),
            send_options: SendOptions::default(),
            commitment: CommitmentConfig::confirmed(),
            explorer_tx_url: "https://solscan.io/tx".to_string(),
            default_slippage_bps: 50,
        }
    }
}

/// Drives one swap from token selection to on-chain confirmation.
#[async_trait]
pub trait SwapInteractor: Send + Sync {
    /// Load the token list and make it the active catalog.
    async fn fetch_catalog(&self) -> Result<Arc<TokenCatalog>, SwapError>;

    fn catalog(&self) -> Arc<TokenCatalog>;

    fn form(&self) -> SwapForm;

    fn set_input_token(&self, address: &str) -> Result<(), SwapError>;

    fn set_output_token(&self, address: &str) -> Result<(), SwapError>;

    fn set_amount(&self, amount: &str);

    fn set_slippage_bps(&self, slippage_bps: u16);

    /// Quote `human_amount` of `input_mint` for `output_mint`.
    async fn request_quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        human_amount: &str,
        slippage_bps: u16,
    ) -> Result<HeldQuote, SwapError>;

    /// Quote whatever the form currently holds.
    async fn request_form_quote(&self) -> Result<HeldQuote, SwapError>;

    fn held_quote(&self) -> Option<HeldQuote>;

    fn quote_preview(&self) -> Option<QuotePreview>;

    fn clear_quote(&self);

    /// Build, sign, broadcast and confirm the held quote.
    async fn execute_swap(&self, signer: &dyn WalletSigner) -> Result<SwapResult, SwapError>;

    async fn quote_and_execute(
        &self,
        input_mint: &str,
        output_mint: &str,
        human_amount: &str,
        slippage_bps: u16,
        signer: &dyn WalletSigner,
    ) -> Result<SwapResult, SwapError>;

    fn explorer_url(&self, signature: &Signature) -> String;
}

struct SwapState {
    catalog: Arc<TokenCatalog>,
    catalog_generation: u64,
    form: SwapForm,
    held_quote: Option<HeldQuote>,
    quote_generation: u64,
    executing: bool,
}

impl SwapState {
    /// Drop the held quote and orphan any quote request still in flight.
    fn invalidate_quote(&mut self) {
        self.held_quote = None;
        self.quote_generation += 1;
    }

    fn update_form(&mut self, update: impl FnOnce(&mut SwapForm)) {
        let before = self.form.clone();
        update(&mut self.form);
        if self.form != before {
            self.invalidate_quote();
        }
    }
}

/// Clears `executing` when the swap ends, including when its future is
/// dropped mid-flight.
struct ExecutingGuard<'a> {
    state: &'a Mutex<SwapState>,
}

impl Drop for ExecutingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .executing = false;
    }
}

pub struct SwapInteractorImpl {
    token_repository: Arc<dyn TokenRepository>,
    quote_service: Arc<dyn QuoteService>,
    swap_service: Arc<dyn SwapService>,
    network: Arc<dyn NetworkClient>,
    settings: SwapSettings,
    state: Mutex<SwapState>,
}

impl SwapInteractorImpl {
    pub fn new(
        token_repository: Arc<dyn TokenRepository>,
        quote_service: Arc<dyn QuoteService>,
        swap_service: Arc<dyn SwapService>,
        network: Arc<dyn NetworkClient>,
        settings: SwapSettings,
    ) -> Self {
        let form = SwapForm::new(settings.default_slippage_bps);

        Self {
            token_repository,
            quote_service,
            swap_service,
            network,
            settings,
            state: Mutex::new(SwapState {
                catalog: Arc::new(TokenCatalog::default()),
                catalog_generation: 0,
                form,
                held_quote: None,
                quote_generation: 0,
                executing: false,
            }),
        }
    }

    pub fn settings(&self) -> &SwapSettings {
        &self.settings
    }

    fn lock_state(&self) -> MutexGuard<'_, SwapState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn catalog_token(catalog: &TokenCatalog, address: &str) -> Result<Token, SwapError> {
        catalog
            .get(address)
            .cloned()
            .ok_or_else(|| SwapError::UnknownToken(address.to_string()))
    }

    fn human_amount(catalog: &TokenCatalog, mint: &str, base_units: u64) -> Decimal {
        catalog
            .get(mint)
            .and_then(|token| from_base_units(base_units, token.decimals))
            .unwrap_or_else(|| Decimal::from(base_units))
    }

    /// Steps after the preconditions: build, decode, sign, broadcast, confirm.
    async fn run_swap(
        &self,
        held: &HeldQuote,
        user: Pubkey,
        signer: &dyn WalletSigner,
    ) -> Result<Signature, SwapError> {
        info!(
            "Building swap transaction: {} {} -> {} for {}",
            held.request.amount, held.request.input_mint, held.request.output_mint, user
        );
        let swap_transaction = self
            .swap_service
            .build_swap_transaction(&held.quote, &user)
            .await?;

        let transaction = decode_swap_transaction(&swap_transaction.transaction_base64)?;
        let blockhash = *transaction.message.recent_blockhash();

        debug!("Requesting wallet signature");
        let signed = signer.sign_transaction(transaction).await?;

        let signature = self
            .network
            .send_raw_transaction(&signed, self.settings.send_options)
            .await?;
        info!("Transaction {} sent, awaiting confirmation", signature);

        let status = self
            .network
            .confirm_transaction(
                &ConfirmationRequest {
                    signature,
                    blockhash,
                    last_valid_block_height: swap_transaction.last_valid_block_height,
                },
                self.settings.commitment,
            )
            .await?;

        if let Some(detail) = status.err {
            warn!("Transaction {} landed with an error: {}", signature, detail);
            return Err(SwapError::ExecutionFailed { signature, detail });
        }

        Ok(signature)
    }
}

#[async_trait]
impl SwapInteractor for SwapInteractorImpl {
    async fn fetch_catalog(&self) -> Result<Arc<TokenCatalog>, SwapError> {
        let generation = {
            let mut state = self.lock_state();
            state.catalog_generation += 1;
            state.catalog_generation
        };

        let result = self.token_repository.get_tokens().await;

        let mut state = self.lock_state();
        if state.catalog_generation != generation {
            debug!("Discarding superseded token list response");
            return Err(SwapError::Superseded);
        }

        let catalog = Arc::new(TokenCatalog::new(result?));
        state.catalog = catalog.clone();

        Ok(catalog)
    }

    fn catalog(&self) -> Arc<TokenCatalog> {
        self.lock_state().catalog.clone()
    }

    fn form(&self) -> SwapForm {
        self.lock_state().form.clone()
    }

    fn set_input_token(&self, address: &str) -> Result<(), SwapError> {
        let mut state = self.lock_state();
        let token = Self::catalog_token(&state.catalog, address)?;
        state.update_form(|form| form.input_mint = Some(token.address));
        Ok(())
    }

    fn set_output_token(&self, address: &str) -> Result<(), SwapError> {
        let mut state = self.lock_state();
        let token = Self::catalog_token(&state.catalog, address)?;
        state.update_form(|form| form.output_mint = Some(token.address));
        Ok(())
    }

    fn set_amount(&self, amount: &str) {
        let amount = amount.trim().to_string();
        self.lock_state().update_form(|form| form.amount = amount);
    }

    fn set_slippage_bps(&self, slippage_bps: u16) {
        self.lock_state()
            .update_form(|form| form.slippage_bps = slippage_bps);
    }

    async fn request_quote(
        &self,
        input_mint: &str,
        output_mint: &str,
        human_amount: &str,
        slippage_bps: u16,
    ) -> Result<HeldQuote, SwapError> {
        let (generation, request) = {
            let mut state = self.lock_state();
            state.update_form(|form| {
                form.input_mint = Some(input_mint.to_string());
                form.output_mint = Some(output_mint.to_string());
                form.amount = human_amount.trim().to_string();
                form.slippage_bps = slippage_bps;
            });
            // A new request always supersedes the previous one
            state.invalidate_quote();

            if input_mint == output_mint {
                return Err(SwapError::SameToken);
            }
            let input = Self::catalog_token(&state.catalog, input_mint)?;
            Self::catalog_token(&state.catalog, output_mint)?;

            let amount = to_base_units(parse_human_amount(human_amount)?, input.decimals)?;

            (
                state.quote_generation,
                QuoteRequest {
                    input_mint: input_mint.to_string(),
                    output_mint: output_mint.to_string(),
                    amount,
                    slippage_bps,
                },
            )
        };

        let result = self.quote_service.get_quote(&request).await;

        let mut state = self.lock_state();
        if state.quote_generation != generation {
            debug!(
                "Discarding superseded quote for {} {} -> {}",
                request.amount, request.input_mint, request.output_mint
            );
            return Err(SwapError::Superseded);
        }

        let held = HeldQuote {
            request,
            quote: result?,
            quoted_at: Utc::now(),
            received_at: Instant::now(),
            generation,
        };
        state.held_quote = Some(held.clone());

        Ok(held)
    }

    async fn request_form_quote(&self) -> Result<HeldQuote, SwapError> {
        let form = self.form();
        let input_mint = form
            .input_mint
            .ok_or_else(|| SwapError::UnknownToken("no input token selected".to_string()))?;
        let output_mint = form
            .output_mint
            .ok_or_else(|| SwapError::UnknownToken("no output token selected".to_string()))?;

        self.request_quote(&input_mint, &output_mint, &form.amount, form.slippage_bps)
            .await
    }

    fn held_quote(&self) -> Option<HeldQuote> {
        self.lock_state().held_quote.clone()
    }

    fn quote_preview(&self) -> Option<QuotePreview> {
        let state = self.lock_state();
        let held = state.held_quote.as_ref()?;
        let catalog = &state.catalog;
        let request = &held.request;

        let in_amount = Self::human_amount(catalog, &request.input_mint, request.amount);
        let out_amount = Self::human_amount(catalog, &request.output_mint, held.quote.out_amount);

        Some(QuotePreview {
            input_symbol: catalog.label(&request.input_mint),
            output_symbol: catalog.label(&request.output_mint),
            in_amount,
            out_amount,
            rate: out_amount.checked_div(in_amount).map(|rate| rate.round_dp(6)),
            quoted_at: held.quoted_at,
        })
    }

    fn clear_quote(&self) {
        self.lock_state().invalidate_quote();
    }

    async fn execute_swap(&self, signer: &dyn WalletSigner) -> Result<SwapResult, SwapError> {
        let (held, user) = {
            let mut state = self.lock_state();
            if state.executing {
                return Err(SwapError::SwapInProgress);
            }

            let held = state.held_quote.clone().ok_or(SwapError::NoQuote)?;
            let user = signer.public_key().ok_or(SwapError::WalletNotConnected)?;

            if held.is_stale(self.settings.quote_max_age) {
                let age_secs = held.age().as_secs();
                warn!("Refusing to swap against a quote {}s old", age_secs);
                state.invalidate_quote();
                return Err(SwapError::StaleQuote { age_secs });
            }

            state.executing = true;
            (held, user)
        };

        let executing = ExecutingGuard { state: &self.state };
        let result = self.run_swap(&held, user, signer).await;
        drop(executing);

        let mut state = self.lock_state();

        let signature = match result {
            Ok(signature) => signature,
            Err(e) => {
                warn!("Swap attempt failed: {}", e);
                return Err(e);
            }
        };

        // The quote is single-use; a newer one obtained meanwhile is kept
        if state.held_quote.as_ref().map(|quote| quote.generation) == Some(held.generation) {
            state.invalidate_quote();
            state.form.amount.clear();
        }

        let catalog = &state.catalog;
        let request = &held.request;
        info!("Swap confirmed: {}", signature);

        Ok(SwapResult {
            signature,
            confirmed: true,
            error: None,
            input_symbol: catalog.label(&request.input_mint),
            output_symbol: catalog.label(&request.output_mint),
            amount_in: Self::human_amount(catalog, &request.input_mint, request.amount),
            amount_out: Self::human_amount(catalog, &request.output_mint, held.quote.out_amount),
            explorer_url: self.explorer_url(&signature),
        })
    }

    async fn quote_and_execute(
        &self,
        input_mint: &str,
        output_mint: &str,
        human_amount: &str,
        slippage_bps: u16,
        signer: &dyn WalletSigner,
    ) -> Result<SwapResult, SwapError> {
        self.request_quote(input_mint, output_mint, human_amount, slippage_bps)
            .await?;
        self.execute_swap(signer).await
    }

    fn explorer_url(&self, signature: &Signature) -> String {
        format!(
            "{}/{}",
            self.settings.explorer_tx_url.trim_end_matches('/'),
            signature
        )
    }
}
