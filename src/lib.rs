//! # Coinbase Client
//!
//! An async Rust client library for the Coinbase v2 REST API.
//!
//! ## Features
//!
//! - API key (HMAC-SHA256) and OAuth2 authentication
//! - Transparent OAuth token refresh, at most one refresh per expiry
//! - Cursor pagination over list endpoints
//! - Strong typing for request/response types
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinbase_api_client::rest::CoinbaseRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinbaseRestClient::new();
//!     let time = client.get_server_time().await?;
//!     println!("Server time: {:?}", time);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod rest;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{CoinbaseError, TransportError};
pub use rest::{CoinbaseRestClient, PaginatedResult};
pub use types::Money;

/// Result type alias using CoinbaseError
pub type Result<T> = std::result::Result<T, CoinbaseError>;
