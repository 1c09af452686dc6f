//! Per-request authentication strategies.
//!
//! - API key: every request is signed with HMAC-SHA256 over the current
//!   server time, the verb, the resolved path and the body.
//! - OAuth: the request carries the current bearer token. A 401 answer
//!   triggers one refresh of the token pair followed by exactly one retry
//!   of the original request; a failure of the retry is returned as is.
//!   Concurrent 401s share a single refresh attempt, successful or not.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use crate::Result;
use crate::auth::oauth::{RefreshGrant, TokenCell};
use crate::auth::{
    ACCESS_KEY_HEADER, ACCESS_SIGN_HEADER, ACCESS_TIMESTAMP_HEADER, ApiKeyCredentials, AuthConfig,
    OAuthCredentials, RefreshedTokens, TokenRefreshCallback, sign_request,
};
use crate::error::CoinbaseError;
use crate::rest::endpoints::{OAUTH_TOKEN_PATH, TIME_PATH};
use crate::rest::request::ResolvedRequest;
use crate::rest::transport::Transport;

/// The auth strategy configured on a client.
#[derive(Clone)]
pub(crate) enum Authenticator {
    ApiKey(ApiKeyCredentials),
    OAuth(Arc<OAuthSession>),
}

/// OAuth state shared by every clone of a client.
pub(crate) struct OAuthSession {
    tokens: TokenCell,
    on_refresh: Option<TokenRefreshCallback>,
}

impl Authenticator {
    pub fn new(config: AuthConfig, on_refresh: Option<TokenRefreshCallback>) -> Self {
        match config {
            AuthConfig::ApiKey(credentials) => Authenticator::ApiKey(credentials),
            AuthConfig::OAuth(credentials) => Authenticator::OAuth(Arc::new(OAuthSession {
                tokens: TokenCell::new(credentials),
                on_refresh,
            })),
        }
    }

    /// Send `request` through `transport` with this strategy's headers.
    pub async fn dispatch(
        &self,
        transport: &Transport,
        request: &ResolvedRequest,
    ) -> Result<Value> {
        match self {
            Authenticator::ApiKey(credentials) => {
                let headers = api_key_headers(transport, credentials, request).await?;
                transport.send(request, headers).await
            }
            Authenticator::OAuth(session) => session.dispatch(transport, request).await,
        }
    }

    /// Current OAuth credentials, `None` for API key auth.
    pub async fn oauth_credentials(&self) -> Option<OAuthCredentials> {
        match self {
            Authenticator::ApiKey(_) => None,
            Authenticator::OAuth(session) => Some(session.tokens.credentials().await),
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authenticator::ApiKey(credentials) => {
                f.debug_tuple("ApiKey").field(credentials).finish()
            }
            Authenticator::OAuth(_) => f.write_str("OAuth"),
        }
    }
}

impl OAuthSession {
    async fn dispatch(
        &self,
        transport: &Transport,
        request: &ResolvedRequest,
    ) -> Result<Value> {
        let snapshot = self.tokens.snapshot().await;
        match transport
            .send(request, bearer_headers(&snapshot.access_token)?)
            .await
        {
            Err(err) if err.is_unauthorized() => {
                tracing::debug!(path = %request.path, "access token rejected, refreshing");
                self.refresh(transport, snapshot.generation).await?;

                let renewed = self.tokens.snapshot().await;
                transport
                    .send(request, bearer_headers(&renewed.access_token)?)
                    .await
            }
            other => other,
        }
    }

    /// Refresh the token pair last seen at `generation`.
    ///
    /// Concurrent callers that saw the same generation wait for the first
    /// attempt to finish. They then return without refreshing again, or with
    /// the error of that attempt if it failed.
    async fn refresh(&self, transport: &Transport, generation: u64) -> Result<()> {
        let Some(lease) = self.tokens.lease(generation).await? else {
            tracing::debug!("tokens already refreshed by a concurrent request");
            return Ok(());
        };

        let tokens = match request_tokens(transport, lease.grant()).await {
            Ok(tokens) => tokens,
            Err(err) => {
                tracing::warn!("OAuth token refresh failed: {}", err);
                lease.fail(&err).await;
                return Err(err);
            }
        };
        lease.commit(&tokens).await;
        tracing::debug!("OAuth tokens refreshed");

        if let Some(callback) = &self.on_refresh {
            callback(tokens).await;
        }
        Ok(())
    }
}

async fn request_tokens(transport: &Transport, grant: &RefreshGrant) -> Result<RefreshedTokens> {
    let response = transport.post_json(OAUTH_TOKEN_PATH, grant).await?;
    serde_json::from_value(response).map_err(|e| {
        CoinbaseError::InvalidResponse(format!("Malformed token refresh response: {e}"))
    })
}

async fn api_key_headers(
    transport: &Transport,
    credentials: &ApiKeyCredentials,
    request: &ResolvedRequest,
) -> Result<HeaderMap> {
    let timestamp = server_epoch(transport).await?.to_string();
    let body = request.body_json()?;
    let signature = sign_request(
        credentials,
        &timestamp,
        request.method.as_str(),
        &request.path,
        body.as_deref().unwrap_or(""),
    )?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(ACCESS_KEY_HEADER),
        header_value(&credentials.api_key)?,
    );
    headers.insert(
        HeaderName::from_static(ACCESS_SIGN_HEADER),
        header_value(&signature)?,
    );
    headers.insert(
        HeaderName::from_static(ACCESS_TIMESTAMP_HEADER),
        header_value(&timestamp)?,
    );
    Ok(headers)
}

/// Current server time in Unix seconds, from the public time endpoint.
async fn server_epoch(transport: &Transport) -> Result<u64> {
    let response = transport
        .send(&ResolvedRequest::get(TIME_PATH), HeaderMap::new())
        .await?;
    response
        .get("data")
        .and_then(|data| data.get("epoch"))
        .and_then(Value::as_u64)
        .ok_or_else(|| CoinbaseError::InvalidResponse("Server time missing 'epoch'".to_string()))
}

fn bearer_headers(access_token: &str) -> Result<HeaderMap> {
    let mut value = header_value(&format!("Bearer {access_token}"))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| CoinbaseError::Auth(format!("Invalid header value: {e}")))
}
