use anyhow::Result;
use async_trait::async_trait;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::entity::{FundsStatus, QuotePreview, SwapError, SwapForm, SwapResult, Token, TokenCatalog};
use crate::utils::format_slippage;

#[async_trait]
pub trait SwapView: Send + Sync {
    async fn display_message(&self, text: &str) -> Result<()>;
    async fn display_help(&self, commands: &[(&'static str, &'static str)]) -> Result<()>;
    async fn display_tokens(&self, tokens: &[&Token], catalog_size: usize) -> Result<()>;
    async fn display_form(&self, form: &SwapForm, catalog: &TokenCatalog) -> Result<()>;
    async fn display_quote(&self, preview: &QuotePreview, slippage_bps: u16) -> Result<()>;
    async fn display_processing(&self, preview: &QuotePreview) -> Result<()>;
    async fn display_swap_success(&self, result: &SwapResult) -> Result<()>;
    async fn display_swap_error(&self, error: &SwapError, explorer_url: Option<String>) -> Result<()>;
    async fn display_validation_error(&self, error_message: String) -> Result<()>;
}

/// Line-oriented view over any writer, stdout in the binary.
pub struct TerminalSwapView<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> TerminalSwapView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", text)?;
        out.flush()?;

        Ok(())
    }
}

/// Human description of a failed swap, separating "nothing happened" from
/// "check the explorer".
pub fn describe_swap_error(error: &SwapError, explorer_url: Option<&str>) -> String {
    match error.funds_status() {
        FundsStatus::NotMoved => {
            let mut text = format!(
                "❌ Swap failed: {}\nThe transaction did not execute; your funds have not moved.",
                error
            );
            if let Some(signature) = error.signature() {
                text.push_str(&format!("\nSignature: {}", signature));
            }
            text
        }
        FundsStatus::MayHaveMoved { signature } => {
            let mut text = format!(
                "⚠️ Swap failed: {}\nThe transaction may have been processed. \
                 Check its status before retrying.\nSignature: {}",
                error, signature
            );
            if let Some(url) = explorer_url {
                text.push_str(&format!("\nCheck transaction: {}", url));
            }
            text
        }
    }
}

#[async_trait]
impl<W: Write + Send> SwapView for TerminalSwapView<W> {
    async fn display_message(&self, text: &str) -> Result<()> {
        self.write(text)
    }

    async fn display_help(&self, commands: &[(&'static str, &'static str)]) -> Result<()> {
        let mut text = String::from("Available commands:");
        for (usage, description) in commands {
            text.push_str(&format!("\n  {:<36} {}", usage, description));
        }

        self.write(&text)
    }

    async fn display_tokens(&self, tokens: &[&Token], catalog_size: usize) -> Result<()> {
        if tokens.is_empty() {
            return self.write("No matching tokens.");
        }

        let mut text = format!("{} of {} tokens:", tokens.len(), catalog_size);
        for token in tokens {
            text.push_str(&format!(
                "\n  {:<10} {:<44} {} ({} decimals)",
                token.symbol, token.address, token.name, token.decimals
            ));
        }

        self.write(&text)
    }

    async fn display_form(&self, form: &SwapForm, catalog: &TokenCatalog) -> Result<()> {
        let label = |mint: &Option<String>| {
            mint.as_deref()
                .map(|mint| catalog.label(mint))
                .unwrap_or_else(|| "-".to_string())
        };
        let amount = if form.amount.is_empty() {
            "-"
        } else {
            form.amount.as_str()
        };

        self.write(&format!(
            "From: {}  To: {}  Amount: {}  Slippage: {}",
            label(&form.input_mint),
            label(&form.output_mint),
            amount,
            format_slippage(form.slippage_bps)
        ))
    }

    async fn display_quote(&self, preview: &QuotePreview, slippage_bps: u16) -> Result<()> {
        let mut text = format!(
            "Quote: {} {} → {:.6} {}",
            preview.in_amount.normalize(),
            preview.input_symbol,
            preview.out_amount,
            preview.output_symbol
        );
        if let Some(rate) = preview.rate {
            text.push_str(&format!(
                "\nRate: 1 {} ≈ {} {}",
                preview.input_symbol,
                rate.normalize(),
                preview.output_symbol
            ));
        }
        text.push_str(&format!(
            "\nSlippage: {}\nQuoted at {}",
            format_slippage(slippage_bps),
            preview.quoted_at.format("%H:%M:%S UTC")
        ));

        self.write(&text)
    }

    async fn display_processing(&self, preview: &QuotePreview) -> Result<()> {
        self.write(&format!(
            "Swapping {} {} to {}... Waiting for wallet signature and confirmation...",
            preview.in_amount.normalize(),
            preview.input_symbol,
            preview.output_symbol
        ))
    }

    async fn display_swap_success(&self, result: &SwapResult) -> Result<()> {
        self.write(&format!(
            "✅ Swap completed successfully!\n\
            Sent: {} {}\n\
            Received: ~{:.6} {}\n\
            Transaction signature: {}\n\
            Check transaction: {}",
            result.amount_in.normalize(),
            result.input_symbol,
            result.amount_out,
            result.output_symbol,
            result.signature,
            result.explorer_url
        ))
    }

    async fn display_swap_error(&self, error: &SwapError, explorer_url: Option<String>) -> Result<()> {
        self.write(&describe_swap_error(error, explorer_url.as_deref()))
    }

    async fn display_validation_error(&self, error_message: String) -> Result<()> {
        self.write(&format!("❌ {}", error_message))
    }
}
