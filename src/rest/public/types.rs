//! Types for public REST API endpoints.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Server time response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerTime {
    /// RFC 3339 timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub iso: OffsetDateTime,
    /// Unix timestamp in seconds.
    pub epoch: u64,
}

/// A currency known to Coinbase.
#[derive(Debug, Clone, Deserialize)]
pub struct Currency {
    /// Currency code (e.g. `"USD"`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Smallest transferable amount.
    pub min_size: Decimal,
}

/// Exchange rates of one currency against all others.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRates {
    /// The base currency.
    pub currency: String,
    /// Units of each currency per one unit of the base currency.
    pub rates: HashMap<String, Decimal>,
}

/// A buy, sell or spot price.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Price {
    /// Price of one unit of `base`.
    pub amount: Decimal,
    /// Quote currency.
    pub currency: String,
    /// Base currency, if reported.
    #[serde(default)]
    pub base: Option<String>,
}

/// Request parameters for exchange rates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExchangeRatesRequest {
    /// Base currency (default: USD).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Request parameters for the spot price.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SpotPriceRequest {
    /// Historic date (`YYYY-MM-DD`); the current price when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}
