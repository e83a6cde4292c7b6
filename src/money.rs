//! Price display.

use rusty_money::{Money, iso::Currency};

/// Format an amount in minor units with the currency's symbol and separators.
pub fn format_price(minor_units: u64, currency: &'static Currency) -> String {
    let minor_units = i64::try_from(minor_units).unwrap_or(i64::MAX);

    Money::from_minor(minor_units, currency).to_string()
}
