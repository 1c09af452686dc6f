//! Coinbase REST API endpoint table.
//!
//! Each endpoint is plain data: verb, path template, whether it needs
//! authentication and whether it answers with one resource or a page.
//! [`CoinbaseRestClient::execute`](crate::rest::CoinbaseRestClient::execute)
//! consumes these entries; the typed methods are thin wrappers over it.

use std::borrow::Cow;

use crate::rest::request::{Args, HttpMethod, RequestSpec};

/// Base URL for the Coinbase REST API.
pub const COINBASE_BASE_URL: &str = "https://api.coinbase.com";

/// Server time, also used as the signing clock for API key requests.
pub const TIME_PATH: &str = "/v2/time";

/// OAuth2 token endpoint used for the `refresh_token` grant.
pub const OAUTH_TOKEN_PATH: &str = "/oauth/token";

/// What an endpoint answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// A single resource (or a non-paginated collection)
    Single,
    /// A page of resources with a pagination cursor
    List,
}

/// One row of the endpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: &'static str,
    pub auth: bool,
    pub shape: ResultShape,
}

impl Endpoint {
    const fn new(method: HttpMethod, path: &'static str, auth: bool, shape: ResultShape) -> Self {
        Self {
            method,
            path,
            auth,
            shape,
        }
    }

    /// Build the request for this endpoint with the given arguments.
    pub fn request(&self, args: Option<Args>) -> RequestSpec {
        RequestSpec {
            method: self.method,
            path: Cow::Borrowed(self.path),
            args,
        }
    }
}

use self::ResultShape::{List, Single};
use crate::rest::request::HttpMethod::{Delete, Get, Post, Put};

/// Public endpoints (no authentication required).
pub mod public {
    use super::*;

    /// Get server time.
    pub const TIME: Endpoint = Endpoint::new(Get, TIME_PATH, false, Single);
    /// List known currencies.
    pub const CURRENCIES: Endpoint = Endpoint::new(Get, "/v2/currencies", false, Single);
    /// Get exchange rates for a base currency.
    pub const EXCHANGE_RATES: Endpoint = Endpoint::new(Get, "/v2/exchange-rates", false, Single);
    /// Get the total buy price of a currency pair.
    pub const BUY_PRICE: Endpoint =
        Endpoint::new(Get, "/v2/prices/:currency_pair/buy", false, Single);
    /// Get the total sell price of a currency pair.
    pub const SELL_PRICE: Endpoint =
        Endpoint::new(Get, "/v2/prices/:currency_pair/sell", false, Single);
    /// Get the spot price of a currency pair.
    pub const SPOT_PRICE: Endpoint =
        Endpoint::new(Get, "/v2/prices/:currency_pair/spot", false, Single);
}

/// Private endpoints (authentication required).
pub mod private {
    use super::*;

    // User endpoints
    /// Get the current user.
    pub const CURRENT_USER: Endpoint = Endpoint::new(Get, "/v2/user", true, Single);
    /// Update the current user.
    pub const UPDATE_CURRENT_USER: Endpoint = Endpoint::new(Put, "/v2/user", true, Single);

    // Account endpoints
    /// List accounts.
    pub const ACCOUNTS: Endpoint = Endpoint::new(Get, "/v2/accounts", true, List);
    /// Get one account.
    pub const ACCOUNT: Endpoint = Endpoint::new(Get, "/v2/accounts/:account_id", true, Single);
    /// Update an account.
    pub const UPDATE_ACCOUNT: Endpoint =
        Endpoint::new(Put, "/v2/accounts/:account_id", true, Single);
    /// Delete an account.
    pub const DELETE_ACCOUNT: Endpoint =
        Endpoint::new(Delete, "/v2/accounts/:account_id", true, Single);

    // Address endpoints
    /// List addresses of an account.
    pub const ADDRESSES: Endpoint =
        Endpoint::new(Get, "/v2/accounts/:account_id/addresses", true, List);
    /// Create a receive address.
    pub const CREATE_ADDRESS: Endpoint =
        Endpoint::new(Post, "/v2/accounts/:account_id/addresses", true, Single);

    // Transaction endpoints
    /// List transactions of an account.
    pub const TRANSACTIONS: Endpoint =
        Endpoint::new(Get, "/v2/accounts/:account_id/transactions", true, List);
    /// Get one transaction.
    pub const TRANSACTION: Endpoint = Endpoint::new(
        Get,
        "/v2/accounts/:account_id/transactions/:transaction_id",
        true,
        Single,
    );
    /// Send, transfer or request money.
    pub const CREATE_TRANSACTION: Endpoint =
        Endpoint::new(Post, "/v2/accounts/:account_id/transactions", true, Single);

    // Trade endpoints
    /// List buys of an account.
    pub const BUYS: Endpoint = Endpoint::new(Get, "/v2/accounts/:account_id/buys", true, List);
    /// List sells of an account.
    pub const SELLS: Endpoint = Endpoint::new(Get, "/v2/accounts/:account_id/sells", true, List);

    // Transfer endpoints
    /// List deposits of an account.
    pub const DEPOSITS: Endpoint =
        Endpoint::new(Get, "/v2/accounts/:account_id/deposits", true, List);
    /// List withdrawals of an account.
    pub const WITHDRAWALS: Endpoint =
        Endpoint::new(Get, "/v2/accounts/:account_id/withdrawals", true, List);

    // Payment method endpoints
    /// List payment methods.
    pub const PAYMENT_METHODS: Endpoint = Endpoint::new(Get, "/v2/payment-methods", true, List);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::request::resolve;

    #[test]
    fn test_endpoint_request() {
        let mut args = Args::new();
        args.insert("account_id".into(), "acc-1".into());
        args.insert("limit".into(), 10.into());

        let resolved = resolve(&private::TRANSACTIONS.request(Some(args))).unwrap();
        assert_eq!(resolved.method, HttpMethod::Get);
        assert_eq!(resolved.path, "/v2/accounts/acc-1/transactions?limit=10");
    }

    #[test]
    fn test_public_endpoints_need_no_auth() {
        for endpoint in [
            public::TIME,
            public::CURRENCIES,
            public::EXCHANGE_RATES,
            public::BUY_PRICE,
            public::SELL_PRICE,
            public::SPOT_PRICE,
        ] {
            assert!(!endpoint.auth, "{} should be public", endpoint.path);
        }
        assert!(private::ACCOUNTS.auth);
        assert_eq!(private::ACCOUNTS.shape, ResultShape::List);
    }
}
