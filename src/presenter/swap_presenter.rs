use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::commands::{register_commands, Command, TOKEN_LIST_LIMIT};
use crate::entity::SwapError;
use crate::interactor::SwapInteractor;
use crate::solana::WalletSigner;
use crate::utils::parse_slippage_bps;
use crate::view::SwapView;

#[async_trait]
pub trait SwapPresenter: Send + Sync {
    /// Run one command; `false` once the user asked to quit.
    async fn handle(&self, command: Command) -> Result<bool>;

    async fn display_error(&self, message: String) -> Result<()>;
}

pub struct SwapPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
    wallet: Arc<dyn WalletSigner>,
}

impl<I, V> SwapPresenterImpl<I, V>
where
    I: SwapInteractor,
    V: SwapView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>, wallet: Arc<dyn WalletSigner>) -> Self {
        Self {
            interactor,
            view,
            wallet,
        }
    }

    /// Symbol or mint to mint address.
    fn resolve(&self, query: &str) -> Result<String, SwapError> {
        self.interactor
            .catalog()
            .resolve(query)
            .map(|token| token.address.clone())
            .ok_or_else(|| SwapError::UnknownToken(query.to_string()))
    }

    async fn show_form(&self) -> Result<()> {
        let form = self.interactor.form();
        self.view
            .display_form(&form, &self.interactor.catalog())
            .await
    }

    async fn show_swap_error(&self, error: SwapError) -> Result<()> {
        if matches!(error, SwapError::Superseded) {
            debug!("Swap result superseded");
            return Ok(());
        }

        let explorer_url = error
            .signature()
            .map(|signature| self.interactor.explorer_url(signature));
        self.view.display_swap_error(&error, explorer_url).await
    }

    async fn select_token(&self, query: &str, input: bool) -> Result<()> {
        let selected = self.resolve(query).and_then(|address| {
            if input {
                self.interactor.set_input_token(&address)
            } else {
                self.interactor.set_output_token(&address)
            }
        });

        match selected {
            Ok(()) => self.show_form().await,
            Err(e) => self.view.display_validation_error(e.to_string()).await,
        }
    }

    async fn quote(&self) -> Result<()> {
        match self.interactor.request_form_quote().await {
            Ok(held) => match self.interactor.quote_preview() {
                Some(preview) => {
                    self.view
                        .display_quote(&preview, held.request.slippage_bps)
                        .await
                }
                None => Ok(()),
            },
            Err(SwapError::Superseded) => Ok(()),
            Err(e) => self.view.display_validation_error(e.to_string()).await,
        }
    }

    async fn swap(&self) -> Result<()> {
        if let Some(preview) = self.interactor.quote_preview() {
            self.view.display_processing(&preview).await?;
        }

        match self.interactor.execute_swap(self.wallet.as_ref()).await {
            Ok(result) => self.view.display_swap_success(&result).await,
            Err(e) => self.show_swap_error(e).await,
        }
    }

    async fn swap_now(
        &self,
        amount: &str,
        from: &str,
        to: &str,
        slippage: Option<&str>,
    ) -> Result<()> {
        let slippage_bps = match slippage {
            Some(slippage) => match parse_slippage_bps(slippage) {
                Ok(bps) => bps,
                Err(e) => return self.view.display_validation_error(e.to_string()).await,
            },
            None => self.interactor.form().slippage_bps,
        };
        let mints = self
            .resolve(from)
            .and_then(|from| self.resolve(to).map(|to| (from, to)));
        let (input_mint, output_mint) = match mints {
            Ok(mints) => mints,
            Err(e) => return self.view.display_validation_error(e.to_string()).await,
        };

        self.view
            .display_message(&format!(
                "Preparing swap of {} {} to {}... Getting quote...",
                amount, from, to
            ))
            .await?;

        match self
            .interactor
            .quote_and_execute(
                &input_mint,
                &output_mint,
                amount,
                slippage_bps,
                self.wallet.as_ref(),
            )
            .await
        {
            Ok(result) => self.view.display_swap_success(&result).await,
            Err(e) => self.show_swap_error(e).await,
        }
    }

    async fn status(&self) -> Result<()> {
        self.show_form().await?;

        match (self.interactor.held_quote(), self.interactor.quote_preview()) {
            (Some(held), Some(preview)) => {
                self.view
                    .display_quote(&preview, held.request.slippage_bps)
                    .await?;
                self.view
                    .display_message(&format!("Quote age: {}s", held.age().as_secs()))
                    .await
            }
            _ => self.view.display_message("No quote held.").await,
        }
    }
}

#[async_trait]
impl<I, V> SwapPresenter for SwapPresenterImpl<I, V>
where
    I: SwapInteractor + Send + Sync,
    V: SwapView + Send + Sync,
{
    async fn handle(&self, command: Command) -> Result<bool> {
        match command {
            Command::Tokens(query) => {
                let catalog = self.interactor.catalog();
                if catalog.is_empty() {
                    self.view
                        .display_message("Token list not loaded, try 'refresh'.")
                        .await?;
                } else {
                    let tokens = catalog.search(query.trim(), TOKEN_LIST_LIMIT);
                    self.view.display_tokens(&tokens, catalog.len()).await?;
                }
            }
            Command::From(query) => self.select_token(&query, true).await?,
            Command::To(query) => self.select_token(&query, false).await?,
            Command::Amount(amount) => {
                self.interactor.set_amount(&amount);
                self.show_form().await?;
            }
            Command::Slippage(slippage) => match parse_slippage_bps(&slippage) {
                Ok(bps) => {
                    self.interactor.set_slippage_bps(bps);
                    self.show_form().await?;
                }
                Err(e) => self.view.display_validation_error(e.to_string()).await?,
            },
            Command::Quote => self.quote().await?,
            Command::Swap => self.swap().await?,
            Command::Cancel => {
                self.interactor.clear_quote();
                self.view.display_message("Quote cleared.").await?;
            }
            Command::Status => self.status().await?,
            Command::SwapNow {
                amount,
                from,
                to,
                slippage,
            } => {
                self.swap_now(&amount, &from, &to, slippage.as_deref())
                    .await?
            }
            Command::Refresh => match self.interactor.fetch_catalog().await {
                Ok(catalog) => {
                    self.view
                        .display_message(&format!("Loaded {} tokens.", catalog.len()))
                        .await?
                }
                Err(SwapError::Superseded) => {}
                Err(e) => self.view.display_validation_error(e.to_string()).await?,
            },
            Command::Help => self.view.display_help(&register_commands()).await?,
            Command::Quit => return Ok(false),
        }

        Ok(true)
    }

    async fn display_error(&self, message: String) -> Result<()> {
        self.view.display_validation_error(message).await
    }
}
