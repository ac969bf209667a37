mod quote;
mod swap_error;
mod swap_form;
mod swap_result;
mod token;

pub use quote::{HeldQuote, Quote, QuotePreview, QuoteRequest, SwapTransaction};
pub use swap_error::{FundsStatus, SwapError};
pub use swap_form::SwapForm;
pub use swap_result::SwapResult;
pub use token::{Token, TokenCatalog};
