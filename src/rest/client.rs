//! Coinbase REST API client and request dispatcher.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest_middleware::ClientBuilder;
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;
use crate::auth::{AuthConfig, OAuthCredentials, TokenRefreshCallback};
use crate::error::CoinbaseError;
use crate::rest::authenticator::Authenticator;
use crate::rest::endpoints::{COINBASE_BASE_URL, Endpoint, ResultShape};
use crate::rest::pagination::{PaginatedResult, Pagination};
use crate::rest::request::{Args, RequestSpec, ResolvedRequest, resolve};
use crate::rest::transport::Transport;

/// Header selecting the dated API version.
const API_VERSION_HEADER: &str = "cb-version";

/// The result of a dispatched request.
#[derive(Debug, Clone)]
pub enum Dispatched {
    /// A list payload with its pagination cursor
    Page(PaginatedResult<Value>),
    /// The `data` payload, or the whole response if it had no `data` field
    Value(Value),
}

impl Dispatched {
    /// Deserialize the payload, discarding any pagination cursor.
    pub fn into_typed<T>(self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let value = match self {
            Dispatched::Page(page) => Value::Array(page.into_data()),
            Dispatched::Value(value) => value,
        };
        Ok(serde_json::from_value(value)?)
    }
}

/// The Coinbase REST API client.
///
/// All requests go through [`CoinbaseRestClient::dispatch`]: the path
/// template is resolved, the configured auth strategy is applied when the
/// endpoint requires it, and the `data` envelope is unwrapped.
///
/// Clones share the same connection pool and the same auth state, so an
/// OAuth token refreshed through one clone is seen by all of them.
///
/// # Example
///
/// ```rust,no_run
/// use coinbase_api_client::rest::CoinbaseRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // Create a client for public endpoints only
///     let client = CoinbaseRestClient::new();
///
///     let price = client.get_spot_price("BTC-USD").await?;
///     println!("Spot price: {} {}", price.amount, price.currency);
///
///     Ok(())
/// }
/// ```
///
/// For private endpoints, configure an auth strategy:
///
/// ```rust,no_run
/// use coinbase_api_client::auth::{AuthConfig, refresh_callback};
/// use coinbase_api_client::rest::CoinbaseRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinbaseRestClient::builder()
///         .auth(AuthConfig::oauth("client_id", "client_secret", "access", "refresh"))
///         .on_token_refresh(refresh_callback(|tokens| async move {
///             // Persist tokens.refresh_token somewhere safe.
///             let _ = tokens;
///         }))
///         .build();
///
///     let user = client.get_current_user().await?;
///     println!("Hello {}", user.name.unwrap_or_default());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct CoinbaseRestClient {
    transport: Transport,
    authenticator: Option<Authenticator>,
}

impl CoinbaseRestClient {
    /// Create a new client with default settings.
    ///
    /// This client can only access public endpoints.
    /// Use [`CoinbaseRestClient::builder()`] to configure authentication.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> CoinbaseRestClientBuilder {
        CoinbaseRestClientBuilder::new()
    }

    /// The base URL all request paths are appended to.
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// The current OAuth credentials, including refreshed tokens.
    ///
    /// Returns `None` for clients without OAuth.
    pub async fn oauth_tokens(&self) -> Option<OAuthCredentials> {
        match &self.authenticator {
            Some(authenticator) => authenticator.oauth_credentials().await,
            None => None,
        }
    }

    /// Resolve, authenticate, send and unwrap one request.
    ///
    /// A response with a `data` array and a `pagination` object becomes a
    /// [`Dispatched::Page`]. Any other response with `data` yields that
    /// payload, and a response without `data` is returned unchanged.
    pub async fn dispatch(
        &self,
        spec: &RequestSpec,
        auth_required: bool,
    ) -> Result<Dispatched> {
        let request = resolve(spec)?;
        tracing::debug!(method = %request.method, path = %request.path, "dispatching request");
        let response = self.send(&request, auth_required).await?;
        self.unwrap_envelope(response, auth_required)
    }

    /// Dispatch a request to a list endpoint.
    ///
    /// Fails with [`CoinbaseError::MissingPagination`] if the response has no
    /// cursor. A single object payload becomes a one-record page.
    pub async fn dispatch_list<T>(
        &self,
        spec: &RequestSpec,
        auth_required: bool,
    ) -> Result<PaginatedResult<T>>
    where
        T: DeserializeOwned,
    {
        let request = resolve(spec)?;
        tracing::debug!(method = %request.method, path = %request.path, "dispatching list request");
        self.fetch_page(&request, auth_required).await
    }

    /// Run one row of the endpoint table.
    pub async fn execute(
        &self,
        endpoint: &Endpoint,
        args: Option<Args>,
    ) -> Result<Dispatched> {
        let spec = endpoint.request(args);
        match endpoint.shape {
            ResultShape::Single => self.dispatch(&spec, endpoint.auth).await,
            ResultShape::List => self
                .dispatch_list(&spec, endpoint.auth)
                .await
                .map(Dispatched::Page),
        }
    }

    /// Call a single-resource endpoint and deserialize its payload.
    pub async fn call<T>(&self, endpoint: &Endpoint, args: Option<Args>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.dispatch(&endpoint.request(args), endpoint.auth)
            .await?
            .into_typed()
    }

    /// Call a list endpoint and deserialize its first page.
    pub async fn call_list<T>(
        &self,
        endpoint: &Endpoint,
        args: Option<Args>,
    ) -> Result<PaginatedResult<T>>
    where
        T: DeserializeOwned,
    {
        self.dispatch_list(&endpoint.request(args), endpoint.auth)
            .await
    }

    /// Send a resolved request, authenticated if required.
    async fn send(
        &self,
        request: &ResolvedRequest,
        auth_required: bool,
    ) -> Result<Value> {
        if !auth_required {
            return self.transport.send(request, HeaderMap::new()).await;
        }
        self.authenticator
            .as_ref()
            .ok_or(CoinbaseError::MissingAuthConfig)?
            .dispatch(&self.transport, request)
            .await
    }

    /// Fetch one page of a list endpoint.
    pub(crate) async fn fetch_page<T>(
        &self,
        request: &ResolvedRequest,
        auth_required: bool,
    ) -> Result<PaginatedResult<T>>
    where
        T: DeserializeOwned,
    {
        let Value::Object(mut envelope) = self.send(request, auth_required).await? else {
            return Err(CoinbaseError::MissingPagination);
        };
        let pagination = match envelope.remove("pagination") {
            Some(Value::Null) | None => return Err(CoinbaseError::MissingPagination),
            Some(pagination) => serde_json::from_value::<Pagination>(pagination)?,
        };
        let records = match envelope.remove("data") {
            Some(Value::Array(records)) => records,
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single],
        };
        let data = records
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<T>, _>>()?;

        Ok(PaginatedResult::new(
            data,
            pagination,
            self.clone(),
            auth_required,
        ))
    }

    fn unwrap_envelope(
        &self,
        response: Value,
        auth_required: bool,
    ) -> Result<Dispatched> {
        let Value::Object(mut envelope) = response else {
            return Ok(Dispatched::Value(response));
        };
        let Some(data) = envelope.remove("data") else {
            return Ok(Dispatched::Value(Value::Object(envelope)));
        };

        match (envelope.remove("pagination"), data) {
            (Some(pagination), Value::Array(records)) if !pagination.is_null() => {
                let pagination = serde_json::from_value::<Pagination>(pagination)?;
                Ok(Dispatched::Page(PaginatedResult::new(
                    records,
                    pagination,
                    self.clone(),
                    auth_required,
                )))
            }
            (_, data) => Ok(Dispatched::Value(data)),
        }
    }
}

impl Default for CoinbaseRestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CoinbaseRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoinbaseRestClient")
            .field("base_url", &self.transport.base_url())
            .field("authenticator", &self.authenticator)
            .finish()
    }
}

/// Builder for [`CoinbaseRestClient`].
pub struct CoinbaseRestClientBuilder {
    base_url: String,
    auth: Option<AuthConfig>,
    on_token_refresh: Option<TokenRefreshCallback>,
    user_agent: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
}

impl CoinbaseRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: COINBASE_BASE_URL.to_string(),
            auth: None,
            on_token_refresh: None,
            user_agent: None,
            api_version: None,
            timeout: None,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the auth configuration for private endpoints.
    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set a callback invoked after every OAuth token refresh.
    ///
    /// Ignored unless the auth configuration is [`AuthConfig::OAuth`].
    pub fn on_token_refresh(mut self, callback: TokenRefreshCallback) -> Self {
        self.on_token_refresh = Some(callback);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Pin the dated API version sent as `CB-VERSION` (e.g. `"2024-01-01"`).
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set a total timeout per HTTP call. No timeout is applied by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> CoinbaseRestClient {
        // Build default headers.
        let mut headers = HeaderMap::new();
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("coinbase-api-client/{}", env!("CARGO_PKG_VERSION")));
        let header_value = HeaderValue::from_str(&user_agent)
            .unwrap_or_else(|_| HeaderValue::from_static("coinbase-api-client"));
        headers.insert(USER_AGENT, header_value);
        if let Some(version) = self.api_version.as_deref() {
            match HeaderValue::from_str(version) {
                Ok(value) => {
                    headers.insert(HeaderName::from_static(API_VERSION_HEADER), value);
                }
                Err(e) => tracing::warn!(version, "ignoring invalid API version: {}", e),
            }
        }

        // Build the HTTP client with middleware.
        let mut reqwest_builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            reqwest_builder = reqwest_builder.timeout(timeout);
        }
        let reqwest_client = reqwest_builder.build().unwrap_or_else(|e| {
            tracing::warn!(
                "failed to build HTTP client, falling back to defaults without timeout or headers: {}",
                e
            );
            reqwest::Client::new()
        });

        let client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        if self.on_token_refresh.is_some()
            && !matches!(self.auth, Some(AuthConfig::OAuth(_)))
        {
            tracing::warn!("token refresh callback set without OAuth auth; it will never run");
        }
        let authenticator = self
            .auth
            .map(|auth| Authenticator::new(auth, self.on_token_refresh));

        CoinbaseRestClient {
            transport: Transport::new(client, self.base_url),
            authenticator,
        }
    }
}

impl Default for CoinbaseRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
