// Re-export everything from submodules
pub mod client;
pub mod jupiter;
pub mod transaction;
pub mod utils;
pub mod wallet;

// Re-export commonly used items
pub use client::{
    create_solana_client, ConfirmationRequest, ConfirmationStatus, NetworkClient,
    RpcNetworkClient, SendOptions,
};
pub use transaction::decode_swap_transaction;
pub use utils::{from_base_units, parse_human_amount, to_base_units};
pub use wallet::{keypair_from_base58, parse_pubkey, KeypairWallet, WalletSigner, WatchOnlyWallet};
