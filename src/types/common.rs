//! Common domain types for the Coinbase API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::rest::SortOrder;

/// An amount of money in a given currency.
///
/// Coinbase sends amounts as decimal strings (`"0.10000000"`), which are
/// parsed without loss into a [`Decimal`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount
    pub amount: Decimal,
    /// Currency code (e.g. `"BTC"`, `"USD"`)
    pub currency: String,
}

impl Money {
    /// Create a new amount.
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// A reference to another resource, as embedded in many payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRef {
    /// Resource id
    pub id: String,
    /// Resource kind (e.g. `"account"`, `"user"`)
    #[serde(default)]
    pub resource: Option<String>,
    /// API path of the resource
    #[serde(default)]
    pub resource_path: Option<String>,
}

/// Cursor parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListParams {
    /// Page size (1 to 100, server default 25)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Sort order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    /// Return resources after this id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    /// Return resources before this id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
}

impl ListParams {
    /// Request pages of `limit` resources.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_string_amount() {
        let money: Money =
            serde_json::from_str(r#"{"amount":"0.10000000","currency":"BTC"}"#).unwrap();
        assert_eq!(money.amount, "0.1".parse::<Decimal>().unwrap());
        assert_eq!(money.currency, "BTC");
        assert_eq!(money.to_string(), "0.10000000 BTC");
    }

    #[test]
    fn test_list_params_skip_unset() {
        let params = ListParams {
            order: Some(SortOrder::Asc),
            ..ListParams::with_limit(10)
        };
        assert_eq!(
            serde_json::to_string(&params).unwrap(),
            r#"{"limit":10,"order":"asc"}"#
        );
    }
}
