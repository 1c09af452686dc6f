//! Shared OAuth token state.
//!
//! A client owns exactly one [`TokenCell`]. Every request reads the current
//! bearer token together with the cell's generation; a request that gets a
//! 401 asks for a refresh *of the generation it used*. Refresh attempts are
//! serialized by a gate separate from the token state, and every finished
//! attempt advances the generation. A request that finds the generation
//! already advanced does not refresh: it retries with the newer token, or
//! returns the error of the attempt that failed while it waited.

use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::sync::{Mutex, MutexGuard};

use crate::auth::{OAuthCredentials, RefreshedTokens};
use crate::error::{CoinbaseError, TransportError};

/// Callback invoked with the new token pair after every successful refresh.
///
/// The client awaits the returned future before retrying the original
/// request. The new tokens are already stored when it runs, so the callback
/// may use the client, e.g. read [`oauth_tokens`] or make further requests.
///
/// [`oauth_tokens`]: crate::rest::CoinbaseRestClient::oauth_tokens
pub type TokenRefreshCallback = Arc<dyn Fn(RefreshedTokens) -> BoxFuture<'static, ()> + Send + Sync>;

/// Build a [`TokenRefreshCallback`] from an async closure.
///
/// ```rust
/// use coinbase_api_client::auth::refresh_callback;
///
/// let callback = refresh_callback(|tokens| async move {
///     println!("token refreshed, expires in {:?}s", tokens.expires_in);
/// });
/// # let _ = callback;
/// ```
pub fn refresh_callback<F, Fut>(f: F) -> TokenRefreshCallback
where
    F: Fn(RefreshedTokens) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Arc::new(move |tokens| f(tokens).boxed())
}

/// Bearer token as read at a point in time.
#[derive(Debug, Clone)]
pub(crate) struct TokenSnapshot {
    pub access_token: String,
    pub generation: u64,
}

/// Body of the `refresh_token` grant.
#[derive(serde::Serialize)]
pub(crate) struct RefreshGrant {
    grant_type: &'static str,
    refresh_token: String,
    client_id: String,
    client_secret: String,
}

struct TokenState {
    credentials: OAuthCredentials,
    generation: u64,
    last_failure: Option<RefreshFailure>,
}

/// Outcome of the last refresh attempt, when it failed.
#[derive(Debug, Clone)]
enum RefreshFailure {
    Transport(TransportError),
    Other(String),
}

impl RefreshFailure {
    fn from_error(err: &CoinbaseError) -> Self {
        match err {
            CoinbaseError::Transport(transport) => RefreshFailure::Transport(transport.clone()),
            other => RefreshFailure::Other(other.to_string()),
        }
    }

    fn to_error(&self) -> CoinbaseError {
        match self {
            RefreshFailure::Transport(transport) => CoinbaseError::Transport(transport.clone()),
            RefreshFailure::Other(message) => {
                CoinbaseError::Auth(format!("OAuth token refresh failed: {message}"))
            }
        }
    }
}

/// Holds the OAuth credentials of one client.
///
/// `state` is only locked for short reads and writes; `gate` is held for the
/// whole duration of one refresh attempt.
pub(crate) struct TokenCell {
    state: Mutex<TokenState>,
    gate: Mutex<()>,
}

impl TokenCell {
    pub fn new(credentials: OAuthCredentials) -> Self {
        Self {
            state: Mutex::new(TokenState {
                credentials,
                generation: 0,
                last_failure: None,
            }),
            gate: Mutex::new(()),
        }
    }

    /// Read the current bearer token.
    pub async fn snapshot(&self) -> TokenSnapshot {
        let state = self.state.lock().await;
        TokenSnapshot {
            access_token: state.credentials.expose_access_token().to_string(),
            generation: state.generation,
        }
    }

    /// Copy of the current credentials.
    pub async fn credentials(&self) -> OAuthCredentials {
        self.state.lock().await.credentials.clone()
    }

    /// Take the right to refresh the tokens seen at `generation`.
    ///
    /// Waits for any attempt in flight. Returns `Ok(None)` when another
    /// attempt replaced the tokens since, and the error of that attempt
    /// when it failed.
    pub async fn lease(&self, generation: u64) -> Result<Option<RefreshLease<'_>>, CoinbaseError> {
        let gate = self.gate.lock().await;
        let state = self.state.lock().await;
        if state.generation != generation {
            return match &state.last_failure {
                Some(failure) => Err(failure.to_error()),
                None => Ok(None),
            };
        }

        let credentials = &state.credentials;
        let grant = RefreshGrant {
            grant_type: "refresh_token",
            refresh_token: credentials.expose_refresh_token().to_string(),
            client_id: credentials.client_id.clone(),
            client_secret: credentials.expose_client_secret().to_string(),
        };
        Ok(Some(RefreshLease {
            cell: self,
            grant,
            _gate: gate,
        }))
    }

    async fn finish(&self, outcome: Result<&RefreshedTokens, RefreshFailure>) {
        let mut state = self.state.lock().await;
        match outcome {
            Ok(tokens) => {
                state.credentials.replace_tokens(tokens);
                state.last_failure = None;
            }
            Err(failure) => state.last_failure = Some(failure),
        }
        state.generation += 1;
    }
}

/// Exclusive right to perform one refresh attempt.
///
/// Dropping the lease without [`commit`](Self::commit) or
/// [`fail`](Self::fail) leaves the cell untouched.
pub(crate) struct RefreshLease<'a> {
    cell: &'a TokenCell,
    grant: RefreshGrant,
    _gate: MutexGuard<'a, ()>,
}

impl RefreshLease<'_> {
    pub fn grant(&self) -> &RefreshGrant {
        &self.grant
    }

    /// Store the new tokens and release the gate.
    pub async fn commit(self, tokens: &RefreshedTokens) {
        self.cell.finish(Ok(tokens)).await;
    }

    /// Record a failed attempt so that requests waiting on it get the same error.
    pub async fn fail(self, err: &CoinbaseError) {
        self.cell.finish(Err(RefreshFailure::from_error(err))).await;
    }
}
