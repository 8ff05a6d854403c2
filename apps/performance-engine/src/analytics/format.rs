//! Display formatting for statistics.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round half away from zero, the convention used for every displayed figure.
#[must_use]
pub fn round_display(value: Decimal, places: u32) -> Decimal {
    value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

/// Fixed-point rendering with exactly `places` decimals.
#[must_use]
pub fn format_fixed(value: Decimal, places: u32) -> String {
    let mut rounded = round_display(value, places);
    rounded.rescale(places);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.to_string()
}

/// Signed currency (`+$12.34`, `-$5.00`).
#[must_use]
pub fn format_profit(value: Decimal) -> String {
    let sign = if value >= Decimal::ZERO { "+" } else { "-" };
    format!("{sign}${}", format_fixed(value.abs(), 2))
}

/// R-multiple (`1.23R`).
#[must_use]
pub fn format_r(value: Decimal) -> String {
    format!("{}R", format_fixed(value, 2))
}

/// Percentage already expressed in 0-100 (`55.56%`).
#[must_use]
pub fn format_pct(value: Decimal) -> String {
    format!("{}%", format_fixed(value, 2))
}

/// Optional ratio, `N/A` when undefined.
#[must_use]
pub fn format_ratio(value: Option<Decimal>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format_fixed(v, 2))
}
