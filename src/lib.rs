pub mod commands;
pub mod config;
pub mod di;
pub mod entity;
pub mod interactor;
pub mod presenter;
pub mod router;
pub mod solana;
pub mod utils;
pub mod view;

use anyhow::Result;
use std::sync::Arc;

// Re-export commonly used items
pub use crate::config::AppConfig;
pub use commands::*;
pub use di::*;
pub use entity::*;
pub use interactor::*;
pub use presenter::*;
pub use router::*;
pub use solana::*;
pub use utils::*;
pub use view::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire the services and the terminal router from configuration.
pub fn create_application(config: &AppConfig) -> Result<(TerminalRouter, Arc<ServiceContainer>)> {
    let services = Arc::new(ServiceContainer::new(config)?);
    let router = TerminalRouter::new(services.clone());

    Ok((router, services))
}
