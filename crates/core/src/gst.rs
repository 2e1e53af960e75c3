//! Inclusive GST breakup for sales and purchase registers.
//!
//! Voucher amounts are tax-inclusive. For a rate `r` percent:
//! `taxable = gross * 100 / (100 + r)`, `tax = gross - taxable`, split
//! evenly between CGST and SGST. Rounding is banker's rounding to the
//! currency's decimal places; SGST absorbs the odd paisa so the parts always
//! add back to the gross amount.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GST computation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GstError {
    /// Rates below zero are rejected.
    #[error("GST rate cannot be negative: {0}")]
    NegativeRate(Decimal),
}

/// Tax components of one inclusive amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstBreakup {
    /// Rate in percent.
    pub rate: Decimal,
    /// Amount before tax.
    pub taxable_value: Decimal,
    /// Central share.
    pub cgst: Decimal,
    /// State share.
    pub sgst: Decimal,
    /// `cgst + sgst`.
    pub total_tax: Decimal,
}

fn round(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
}

/// Splits a tax-inclusive amount into taxable value and CGST/SGST.
pub fn split_inclusive(
    gross: Decimal,
    rate_percent: Decimal,
    decimal_places: u32,
) -> Result<GstBreakup, GstError> {
    if rate_percent.is_sign_negative() && !rate_percent.is_zero() {
        return Err(GstError::NegativeRate(rate_percent));
    }

    let hundred = Decimal::ONE_HUNDRED;
    let taxable_value = round(gross * hundred / (hundred + rate_percent), decimal_places);
    let total_tax = gross - taxable_value;
    let cgst = round(total_tax / Decimal::TWO, decimal_places);
    let sgst = total_tax - cgst;

    Ok(GstBreakup {
        rate: rate_percent,
        taxable_value,
        cgst,
        sgst,
        total_tax,
    })
}
