use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

pub const MAX_SLIPPAGE_BPS: u16 = 10_000;

// Validate Solana address
pub fn validate_solana_address(address: &str) -> bool {
    Pubkey::from_str(address).is_ok()
}

// Parse slippage given in percent ("0.5%" or "0.5") into basis points
pub fn parse_slippage_bps(input: &str) -> Result<u16> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^(\d+(?:\.\d+)?)\s*%?$").unwrap();
    }

    let percent = RE
        .captures(input.trim())
        .and_then(|cap| cap.get(1))
        .and_then(|m| Decimal::from_str(m.as_str()).ok())
        .ok_or_else(|| anyhow!("Invalid slippage '{}', expected a percentage like 0.5%", input))?;

    let bps = (percent * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u16()
        .filter(|bps| (1..=MAX_SLIPPAGE_BPS).contains(bps))
        .ok_or_else(|| anyhow!("Slippage must be between 0.01% and 100%"))?;

    Ok(bps)
}

// Format basis points as a percentage
pub fn format_slippage(bps: u16) -> String {
    format!("{}%", Decimal::new(bps as i64, 2).normalize())
}

// Shorten address for display
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }

    let start = &address[..5];
    let end = &address[address.len() - 5..];

    format!("{}...{}", start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slippage_percent_to_bps() {
        assert_eq!(parse_slippage_bps("0.5%").unwrap(), 50);
        assert_eq!(parse_slippage_bps("0.5").unwrap(), 50);
        assert_eq!(parse_slippage_bps("1 %").unwrap(), 100);
        assert_eq!(parse_slippage_bps("0.125%").unwrap(), 13);
        assert!(parse_slippage_bps("0%").is_err());
        assert!(parse_slippage_bps("150%").is_err());
        assert!(parse_slippage_bps("abc").is_err());
    }

    #[test]
    fn slippage_formats_back_to_percent() {
        assert_eq!(format_slippage(50), "0.5%");
        assert_eq!(format_slippage(100), "1%");
        assert_eq!(format_slippage(1), "0.01%");
    }

    #[test]
    fn short_addresses_are_untouched() {
        assert_eq!(shorten_address("So1111"), "So1111");
        assert!(validate_solana_address(
            "So11111111111111111111111111111111111111112"
        ));
        assert!(!validate_solana_address("SOL"));
    }
}
