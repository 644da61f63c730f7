//! Presentation helpers for Brazilian Real amounts.
//!
//! Amounts are carried as unrounded `Decimal` through every calculation;
//! rounding to centavos happens only here, when a value is shown.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places shown for BRL amounts
pub const DISPLAY_SCALE: u32 = 2;

/// Largest amount a stored `DECIMAL(15, 2)` column holds: 9.999.999.999.999,99
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_319, 232_830, 0, false, 2);

/// Rounds an amount to centavos, half away from zero
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount as `R$ 1234,56` (decimal comma, no grouping)
pub fn format_brl(amount: Decimal) -> String {
    let rounded = round_for_display(amount);
    format!("R$ {:.2}", rounded).replace('.', ",")
}

/// Formats a percentage with up to two decimals and a decimal comma
pub fn format_pct(pct: Decimal) -> String {
    format!("{}%", round_for_display(pct).normalize()).replace('.', ",")
}

/// Validates that a catalog or answer amount is not negative
pub fn validate_non_negative(field: &str, amount: Decimal) -> Result<(), String> {
    if amount < Decimal::ZERO {
        return Err(format!("{} cannot be negative, got {}", field, amount));
    }
    Ok(())
}

/// Validates that an amount fits a `DECIMAL(15, 2)` column unchanged:
/// at most two decimal places and no larger than `MAX_AMOUNT` in magnitude
pub fn validate_storable(field: &str, amount: Decimal) -> Result<(), String> {
    if amount.normalize().scale() > DISPLAY_SCALE {
        return Err(format!(
            "{} cannot have more than {} decimal places, got {}",
            field, DISPLAY_SCALE, amount
        ));
    }
    if amount.abs() > MAX_AMOUNT {
        return Err(format!("{} cannot exceed {}, got {}", field, MAX_AMOUNT, amount));
    }
    Ok(())
}
