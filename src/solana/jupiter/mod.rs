// src/solana/jupiter/mod.rs
pub mod config;
pub mod models;
pub mod quote_service;
pub mod swap_service;
pub mod token_repository;

// Re-exports for convenient use
pub use models::{
    JupiterToken, PrioritizationFeeLamports, PrioritizationFeeLamportsWrapper, SwapRequest,
    SwapResponse,
};

pub use config::Config;
pub use quote_service::{JupiterQuoteService, QuoteService};
pub use swap_service::{JupiterSwapService, SwapService};
pub use token_repository::{JupiterTokenRepository, TokenRepository};
