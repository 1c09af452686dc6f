//! Coinbase REST API client.
//!
//! Requests flow through one pipeline:
//!
//! 1. [`request::resolve`] fills path placeholders and places the remaining
//!    arguments in the query string or the JSON body.
//! 2. The configured auth strategy adds headers (and refreshes OAuth tokens
//!    on a 401).
//! 3. The transport performs the HTTP call.
//! 4. The dispatcher unwraps the `data` envelope, wrapping list payloads in
//!    a [`PaginatedResult`].
//!
//! ```rust,ignore
//! use coinbase_api_client::rest::{CoinbaseRestClient, RequestSpec};
//!
//! let client = CoinbaseRestClient::new();
//! let spec = RequestSpec::get("/v2/prices/:currency_pair/spot").arg("currency_pair", "ETH-EUR");
//! let price = client.dispatch(&spec, false).await?;
//! ```

mod authenticator;
mod client;
pub mod endpoints;
mod pagination;
pub mod private;
pub mod public;
pub mod request;
mod transport;

pub use client::{CoinbaseRestClient, CoinbaseRestClientBuilder, Dispatched};
pub use endpoints::{Endpoint, ResultShape};
pub use pagination::{PaginatedResult, Pagination, SortOrder};
pub use request::{Args, HttpMethod, RequestSpec, ResolvedRequest};
