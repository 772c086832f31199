//! Bank records flowing through the pipeline

use serde::Serialize;

/// Column names of the persisted dataset, in output order.
pub const COLUMNS: [&str; 5] = [
    "Name",
    "MC_USD_Billion",
    "MC_GBP_Billion",
    "MC_EUR_Billion",
    "MC_INR_Billion",
];

/// One bank as read from the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    pub name: String,
    pub market_cap_usd_billion: f64,
}

/// A bank record with its market capitalization converted to GBP, EUR and INR.
///
/// Converted values are already rounded to 2 decimal places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedBankRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MC_USD_Billion")]
    pub market_cap_usd_billion: f64,
    #[serde(rename = "MC_GBP_Billion")]
    pub market_cap_gbp_billion: f64,
    #[serde(rename = "MC_EUR_Billion")]
    pub market_cap_eur_billion: f64,
    #[serde(rename = "MC_INR_Billion")]
    pub market_cap_inr_billion: f64,
}

/// Records in source table order.
pub type Dataset = Vec<EnrichedBankRecord>;
