//! Converts USD market caps into the other reporting currencies.

use crate::core::{BankRecord, Dataset, EnrichedBankRecord, MissingRateError};
use crate::etl::rates::RateTable;
use rust_decimal::prelude::*;
use tracing::debug;

/// Currencies added to every record, in the order they are checked.
pub const TARGET_CURRENCIES: [&str; 3] = ["GBP", "EUR", "INR"];

/// Decimal places kept in converted values.
pub const CONVERTED_SCALE: u32 = 2;

/// Multiplies `usd` by `rate` and rounds half-to-even to 2 decimal places.
///
/// Both operands are taken at their shortest decimal form so that
/// `2500.75 * 0.9 = 2250.675` rounds to `2250.68` rather than being decided
/// by binary representation error.
pub fn convert(usd: f64, rate: f64) -> f64 {
    let exact = Decimal::from_str(&usd.to_string())
        .ok()
        .zip(Decimal::from_str(&rate.to_string()).ok())
        .and_then(|(usd, rate)| usd.checked_mul(rate))
        .map(|product| {
            product.round_dp_with_strategy(CONVERTED_SCALE, RoundingStrategy::MidpointNearestEven)
        })
        .and_then(|rounded| rounded.to_string().parse::<f64>().ok());

    match exact {
        Some(value) => value,
        None => {
            let scale = 10f64.powi(CONVERTED_SCALE as i32);
            (usd * rate * scale).round_ties_even() / scale
        }
    }
}

/// Adds GBP, EUR and INR market caps to each record, preserving order.
///
/// Every target currency must be present in `rates`; otherwise nothing is
/// converted.
pub fn transform(
    dataset: Vec<BankRecord>,
    rates: &RateTable,
) -> Result<Dataset, MissingRateError> {
    let [gbp, eur, inr] = TARGET_CURRENCIES.map(|code| {
        rates.get(code).ok_or_else(|| MissingRateError {
            code: code.to_string(),
        })
    });
    let (gbp, eur, inr) = (gbp?, eur?, inr?);
    debug!("Converting with GBP={}, EUR={}, INR={}", gbp, eur, inr);

    Ok(dataset
        .into_iter()
        .map(|record| EnrichedBankRecord {
            market_cap_gbp_billion: convert(record.market_cap_usd_billion, gbp),
            market_cap_eur_billion: convert(record.market_cap_usd_billion, eur),
            market_cap_inr_billion: convert(record.market_cap_usd_billion, inr),
            market_cap_usd_billion: record.market_cap_usd_billion,
            name: record.name,
        })
        .collect())
}
