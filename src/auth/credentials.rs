//! Credential management for Coinbase API authentication.

use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

use crate::Result;
use crate::error::CoinbaseError;

/// API key credentials containing the key and secret.
#[derive(Clone)]
pub struct ApiKeyCredentials {
    /// The API key (public identifier)
    pub api_key: String,
    /// The API secret (private, used for signing)
    api_secret: SecretString,
}

impl ApiKeyCredentials {
    /// Create new credentials from an API key and secret.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }

    /// Get the API secret for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for ApiKeyCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// OAuth2 client registration plus the current token pair.
///
/// The token pair is replaced in place by the client whenever a refresh
/// succeeds; read the latest values back with
/// [`CoinbaseRestClient::oauth_tokens`](crate::rest::CoinbaseRestClient::oauth_tokens)
/// or a refresh callback.
#[derive(Clone)]
pub struct OAuthCredentials {
    /// OAuth application client id
    pub client_id: String,
    client_secret: SecretString,
    access_token: SecretString,
    refresh_token: SecretString,
}

impl OAuthCredentials {
    /// Create new OAuth credentials.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            access_token: SecretString::from(access_token.into()),
            refresh_token: SecretString::from(refresh_token.into()),
        }
    }

    /// Get the client secret.
    pub fn expose_client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    /// Get the current bearer token.
    pub fn expose_access_token(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Get the current refresh token.
    pub fn expose_refresh_token(&self) -> &str {
        self.refresh_token.expose_secret()
    }

    pub(crate) fn replace_tokens(&mut self, tokens: &RefreshedTokens) {
        self.access_token = SecretString::from(tokens.access_token.clone());
        self.refresh_token = SecretString::from(tokens.refresh_token.clone());
    }
}

impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

/// A freshly issued token pair, handed to the refresh callback.
#[derive(Clone, PartialEq, Eq, serde::Deserialize)]
pub struct RefreshedTokens {
    /// The new bearer token
    pub access_token: String,
    /// The new refresh token (the old one is now invalid)
    pub refresh_token: String,
    /// Lifetime of the access token in seconds, if reported
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scopes, if reported
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for RefreshedTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshedTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// The authentication strategy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStrategy {
    /// Static API key with HMAC-SHA256 request signing
    ApiKey,
    /// OAuth2 bearer token with refresh on expiry
    OAuth,
}

impl FromStr for AuthStrategy {
    type Err = CoinbaseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api_key" | "apikey" => Ok(AuthStrategy::ApiKey),
            "oauth" | "oauth2" => Ok(AuthStrategy::OAuth),
            _ => Err(CoinbaseError::UnrecognizedAuthStrategy(s.trim().to_string())),
        }
    }
}

/// How a client authenticates its requests.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Sign every request with an API key and secret
    ApiKey(ApiKeyCredentials),
    /// Send a bearer token, refreshing it when the API answers 401
    OAuth(OAuthCredentials),
}

impl AuthConfig {
    /// Shorthand for [`AuthConfig::ApiKey`].
    pub fn api_key(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        AuthConfig::ApiKey(ApiKeyCredentials::new(api_key, api_secret))
    }

    /// Shorthand for [`AuthConfig::OAuth`].
    pub fn oauth(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        AuthConfig::OAuth(OAuthCredentials::new(
            client_id,
            client_secret,
            access_token,
            refresh_token,
        ))
    }

    /// The strategy tag of this configuration.
    pub fn strategy(&self) -> AuthStrategy {
        match self {
            AuthConfig::ApiKey(_) => AuthStrategy::ApiKey,
            AuthConfig::OAuth(_) => AuthStrategy::OAuth,
        }
    }

    /// Load auth configuration from the environment.
    ///
    /// `COINBASE_AUTH_STRATEGY` selects the strategy (`api_key` when unset).
    /// The API key strategy reads `COINBASE_API_KEY` and `COINBASE_API_SECRET`;
    /// OAuth reads `COINBASE_CLIENT_ID`, `COINBASE_CLIENT_SECRET`,
    /// `COINBASE_ACCESS_TOKEN` and `COINBASE_REFRESH_TOKEN`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`AuthConfig::from_env`], but returns `None` when nothing is configured.
    pub fn try_from_env() -> Option<Self> {
        Self::from_env().ok()
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let strategy = match lookup("COINBASE_AUTH_STRATEGY") {
            Some(tag) => tag.parse()?,
            None => AuthStrategy::ApiKey,
        };
        let var = |name: &str| lookup(name).ok_or(CoinbaseError::MissingAuthConfig);

        Ok(match strategy {
            AuthStrategy::ApiKey => {
                Self::api_key(var("COINBASE_API_KEY")?, var("COINBASE_API_SECRET")?)
            }
            AuthStrategy::OAuth => Self::oauth(
                var("COINBASE_CLIENT_ID")?,
                var("COINBASE_CLIENT_SECRET")?,
                var("COINBASE_ACCESS_TOKEN")?,
                var("COINBASE_REFRESH_TOKEN")?,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = ApiKeyCredentials::new("my_key", "super_secret");
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("my_key"));
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));

        let oauth = OAuthCredentials::new("client", "csecret", "atoken", "rtoken");
        let debug_str = format!("{:?}", oauth);
        assert!(debug_str.contains("client"));
        assert!(!debug_str.contains("atoken"));
        assert!(!debug_str.contains("rtoken"));
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("api_key".parse::<AuthStrategy>().unwrap(), AuthStrategy::ApiKey);
        assert_eq!("OAuth".parse::<AuthStrategy>().unwrap(), AuthStrategy::OAuth);
        assert!(matches!(
            "jwt".parse::<AuthStrategy>(),
            Err(CoinbaseError::UnrecognizedAuthStrategy(tag)) if tag == "jwt"
        ));
    }

    #[test]
    fn test_from_lookup_defaults_to_api_key() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("COINBASE_API_KEY", "key"),
            ("COINBASE_API_SECRET", "secret"),
        ]))
        .unwrap();
        match config {
            AuthConfig::ApiKey(creds) => {
                assert_eq!(creds.api_key, "key");
                assert_eq!(creds.expose_secret(), "secret");
            }
            other => panic!("unexpected config: {other:?}"),
        }
    }

    #[test]
    fn test_from_lookup_oauth() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("COINBASE_AUTH_STRATEGY", "oauth"),
            ("COINBASE_CLIENT_ID", "id"),
            ("COINBASE_CLIENT_SECRET", "cs"),
            ("COINBASE_ACCESS_TOKEN", "at"),
            ("COINBASE_REFRESH_TOKEN", "rt"),
        ]))
        .unwrap();
        assert_eq!(config.strategy(), AuthStrategy::OAuth);
    }

    #[test]
    fn test_from_lookup_errors() {
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[("COINBASE_API_KEY", "key")])),
            Err(CoinbaseError::MissingAuthConfig)
        ));
        assert!(matches!(
            AuthConfig::from_lookup(lookup(&[("COINBASE_AUTH_STRATEGY", "hmac512")])),
            Err(CoinbaseError::UnrecognizedAuthStrategy(_))
        ));
    }

    #[test]
    fn test_replace_tokens() {
        let mut creds = OAuthCredentials::new("client", "cs", "old_access", "old_refresh");
        creds.replace_tokens(&RefreshedTokens {
            access_token: "new_access".into(),
            refresh_token: "new_refresh".into(),
            expires_in: Some(7200),
            scope: None,
        });
        assert_eq!(creds.expose_access_token(), "new_access");
        assert_eq!(creds.expose_refresh_token(), "new_refresh");
        assert_eq!(creds.expose_client_secret(), "cs");
    }
}
