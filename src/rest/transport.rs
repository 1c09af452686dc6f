//! Raw HTTP transport against the API base URL.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;
use serde_json::Value;

use crate::Result;
use crate::error::{ApiError, CoinbaseError, TransportError};
use crate::rest::request::{HttpMethod, ResolvedRequest};

/// Performs exactly one HTTP call per request and parses the JSON answer.
///
/// The transport never retries and never looks inside a successful
/// payload; unwrapping the envelope is the dispatcher's job.
#[derive(Clone)]
pub(crate) struct Transport {
    http_client: ClientWithMiddleware,
    base_url: String,
}

impl Transport {
    pub fn new(http_client: ClientWithMiddleware, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a resolved request with the given (auth) headers.
    pub async fn send(
        &self,
        request: &ResolvedRequest,
        headers: HeaderMap,
    ) -> Result<Value> {
        let body = request.body_json()?;
        self.execute(request.method, &request.path, body, headers)
            .await
    }

    /// POST an arbitrary JSON document, bypassing argument resolution.
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value>
    where
        B: serde::Serialize,
    {
        let body = serde_json::to_string(body)?;
        self.execute(HttpMethod::Post, path, Some(body), HeaderMap::new())
            .await
    }

    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
        headers: HeaderMap,
    ) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .http_client
            .request(method.into(), &url)
            .headers(headers)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        parse_response(response).await
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Parse a response: JSON on success, [`TransportError`] otherwise.
async fn parse_response(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::debug!(status = status.as_u16(), "request failed");
        return Err(TransportError::new(status.as_u16(), ApiError::from_body(&body)).into());
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| {
        CoinbaseError::InvalidResponse(format!("Failed to parse response: {}. Body: {}", e, body))
    })
}
