pub mod swap_view;

pub use swap_view::{describe_swap_error, SwapView, TerminalSwapView};
