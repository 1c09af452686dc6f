//! Types for private REST API endpoints.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::{Money, ResourceRef};

/// The authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// User id.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Username, if set.
    #[serde(default)]
    pub username: Option<String>,
    /// Profile location.
    #[serde(default)]
    pub profile_location: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Email (requires the `wallet:user:email` scope).
    #[serde(default)]
    pub email: Option<String>,
    /// Preferred time zone.
    #[serde(default)]
    pub time_zone: Option<String>,
    /// Preferred native currency.
    #[serde(default)]
    pub native_currency: Option<String>,
}

/// Fields of the current user that can be changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_currency: Option<String>,
}

/// Kind of account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Wallet,
    Fiat,
    Vault,
    #[serde(other)]
    Other,
}

/// The currency held by an account.
///
/// Older API versions send a bare currency code instead of an object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AccountCurrency {
    Code(String),
    Detailed {
        code: String,
        #[serde(default)]
        name: Option<String>,
    },
}

impl AccountCurrency {
    /// The currency code.
    pub fn code(&self) -> &str {
        match self {
            AccountCurrency::Code(code) => code,
            AccountCurrency::Detailed { code, .. } => code,
        }
    }
}

/// A wallet or vault holding one currency.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Account id.
    pub id: String,
    /// User defined name.
    pub name: String,
    /// Whether this is the primary account for its currency.
    #[serde(default)]
    pub primary: bool,
    /// Kind of account.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Currency held.
    pub currency: AccountCurrency,
    /// Current balance.
    pub balance: Money,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

/// Fields of an account that can be changed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateAccountRequest {
    /// New account name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A receive address of an account.
#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    pub id: String,
    /// The address itself.
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Network the address belongs to (e.g. `"bitcoin"`).
    #[serde(default)]
    pub network: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// Parameters for creating an address.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateAddressRequest {
    /// Optional address label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A movement of money on an account.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    pub id: String,
    /// Transaction type (`send`, `request`, `transfer`, `buy`, ...).
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Status (`pending`, `completed`, `failed`, ...).
    pub status: String,
    /// Amount in the account's currency.
    pub amount: Money,
    /// Amount in the user's native currency.
    #[serde(default)]
    pub native_amount: Option<Money>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// The linked buy, sell, deposit or withdrawal, if any.
    #[serde(default)]
    pub buy: Option<ResourceRef>,
    #[serde(default)]
    pub sell: Option<ResourceRef>,
}

/// Parameters for sending money to an address or email.
#[derive(Debug, Clone, Serialize)]
pub struct SendMoneyRequest {
    #[serde(rename = "type")]
    transaction_type: &'static str,
    /// Destination address or email.
    pub to: String,
    /// Amount to send, as a decimal string.
    pub amount: String,
    /// Currency of `amount`.
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Idempotency token; resending with the same token does not send twice.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idem: Option<String>,
}

impl SendMoneyRequest {
    /// Create a send request.
    pub fn new(
        to: impl Into<String>,
        amount: impl Into<String>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type: "send",
            to: to.into(),
            amount: amount.into(),
            currency: currency.into(),
            description: None,
            idem: None,
        }
    }

    /// Attach a description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an idempotency token.
    pub fn idem(mut self, idem: impl Into<String>) -> Self {
        self.idem = Some(idem.into());
        self
    }
}

/// A buy or a sell.
#[derive(Debug, Clone, Deserialize)]
pub struct Trade {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub payment_method: Option<ResourceRef>,
    #[serde(default)]
    pub transaction: Option<ResourceRef>,
    /// Amount of crypto bought or sold.
    pub amount: Money,
    /// Total in fiat, fees included.
    pub total: Money,
    pub subtotal: Money,
    #[serde(default)]
    pub fee: Option<Money>,
    #[serde(default)]
    pub committed: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A deposit or a withdrawal.
#[derive(Debug, Clone, Deserialize)]
pub struct Transfer {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub payment_method: Option<ResourceRef>,
    #[serde(default)]
    pub transaction: Option<ResourceRef>,
    pub amount: Money,
    pub subtotal: Money,
    #[serde(default)]
    pub fee: Option<Money>,
    #[serde(default)]
    pub committed: bool,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A bank account, card or other payment method.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    pub name: String,
    pub currency: String,
    #[serde(default)]
    pub primary_buy: bool,
    #[serde(default)]
    pub primary_sell: bool,
    #[serde(default)]
    pub allow_buy: bool,
    #[serde(default)]
    pub allow_sell: bool,
    #[serde(default)]
    pub allow_deposit: bool,
    #[serde(default)]
    pub allow_withdraw: bool,
}
