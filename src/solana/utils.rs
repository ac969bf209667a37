use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::entity::SwapError;

/// Parse a user-entered amount; it must be a positive number.
pub fn parse_human_amount(amount: &str) -> Result<Decimal, SwapError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(SwapError::InvalidAmount("amount is empty".to_string()));
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| SwapError::InvalidAmount(format!("'{}' is not a number", trimmed)))?;

    if value <= Decimal::ZERO {
        return Err(SwapError::InvalidAmount(
            "amount must be greater than zero".to_string(),
        ));
    }

    Ok(value)
}

/// Convert a human amount to base units: `round(amount * 10^decimals)`.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<u64, SwapError> {
    let scale = 10i128
        .checked_pow(decimals as u32)
        .and_then(|factor| Decimal::try_from_i128_with_scale(factor, 0).ok())
        .ok_or_else(|| {
            SwapError::InvalidAmount(format!("unsupported token decimals: {}", decimals))
        })?;

    let scaled = amount
        .checked_mul(scale)
        .ok_or_else(|| SwapError::InvalidAmount(format!("{} is too large", amount)))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    let base_units = scaled
        .to_u64()
        .ok_or_else(|| SwapError::InvalidAmount(format!("{} is out of range", amount)))?;

    if base_units == 0 {
        return Err(SwapError::InvalidAmount(format!(
            "{} is smaller than one base unit",
            amount
        )));
    }

    Ok(base_units)
}

/// Convert base units back to a human amount carrying `decimals` places.
pub fn from_base_units(amount: u64, decimals: u8) -> Option<Decimal> {
    Decimal::try_from_i128_with_scale(amount as i128, decimals as u32).ok()
}
