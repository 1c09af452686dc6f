//! Authentication module for the Coinbase API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - HMAC-SHA256 signature generation for API key requests
//! - The shared OAuth token cell and refresh callbacks

mod credentials;
pub(crate) mod oauth;
mod signature;

pub use credentials::{
    ApiKeyCredentials, AuthConfig, AuthStrategy, OAuthCredentials, RefreshedTokens,
};
pub use oauth::{TokenRefreshCallback, refresh_callback};
pub use signature::{
    ACCESS_KEY_HEADER, ACCESS_SIGN_HEADER, ACCESS_TIMESTAMP_HEADER, sign_request,
};
