//! HMAC-SHA256 signature generation for Coinbase API key authentication.
//!
//! Requests signed with an API key carry a signature computed as:
//! ```text
//! hex(HMAC-SHA256(timestamp + METHOD + request_path + body, api_secret))
//! ```
//!
//! `request_path` includes the query string, and `body` is the exact JSON
//! sent on the wire (empty for requests without a body).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::Result;
use crate::auth::ApiKeyCredentials;
use crate::error::CoinbaseError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key.
pub const ACCESS_KEY_HEADER: &str = "cb-access-key";
/// Header carrying the hex signature.
pub const ACCESS_SIGN_HEADER: &str = "cb-access-sign";
/// Header carrying the Unix timestamp used in the signature.
pub const ACCESS_TIMESTAMP_HEADER: &str = "cb-access-timestamp";

/// Sign a request for Coinbase's API key authentication.
///
/// # Arguments
///
/// * `credentials` - API credentials containing the secret
/// * `timestamp` - Unix timestamp (seconds) as sent in [`ACCESS_TIMESTAMP_HEADER`]
/// * `method` - Upper-case HTTP verb
/// * `request_path` - Resolved path, including any query string
/// * `body` - JSON body, or an empty string
///
/// # Example
///
/// ```rust
/// use coinbase_api_client::auth::{ApiKeyCredentials, sign_request};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = ApiKeyCredentials::new("api_key", "api_secret");
/// let signature = sign_request(&credentials, "1431623311", "GET", "/v2/user", "")?;
/// assert_eq!(signature.len(), 64);
/// # Ok(())
/// # }
/// ```
pub fn sign_request(
    credentials: &ApiKeyCredentials,
    timestamp: &str,
    method: &str,
    request_path: &str,
    body: &str,
) -> Result<String> {
    let mut hmac = HmacSha256::new_from_slice(credentials.expose_secret().as_bytes())
        .map_err(|e| CoinbaseError::Auth(format!("Invalid HMAC key: {e}")))?;
    hmac.update(timestamp.as_bytes());
    hmac.update(method.as_bytes());
    hmac.update(request_path.as_bytes());
    hmac.update(body.as_bytes());

    Ok(hex::encode(hmac.finalize().into_bytes()))
}
