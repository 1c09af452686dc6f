//! Request descriptions and path template resolution.
//!
//! A [`RequestSpec`] names an endpoint by verb and path template, e.g.
//! `GET /v2/accounts/:account_id/transactions`, plus a bag of arguments.
//! [`resolve`] fills the `:name` placeholders from the bag and places the
//! remaining arguments in the query string (GET) or the JSON body.

use std::borrow::Cow;

use serde_json::Value;

use crate::Result;
use crate::error::CoinbaseError;

/// Ordered argument bag. Iteration order is insertion order.
pub type Args = serde_json::Map<String, Value>;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Upper-case verb, as used on the wire and in signatures.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// An unresolved request: verb, path template and arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: Cow<'static, str>,
    pub args: Option<Args>,
}

impl RequestSpec {
    /// Create a request without arguments.
    pub fn new(method: HttpMethod, path: impl Into<Cow<'static, str>>) -> Self {
        Self {
            method,
            path: path.into(),
            args: None,
        }
    }

    pub fn get(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn delete(path: impl Into<Cow<'static, str>>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Replace the argument bag.
    pub fn with_args(mut self, args: Args) -> Self {
        self.args = Some(args);
        self
    }

    /// Append one argument.
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args
            .get_or_insert_with(Args::new)
            .insert(name.into(), value.into());
        self
    }
}

/// A request ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub method: HttpMethod,
    /// Path with placeholders filled, including the query string for GET.
    pub path: String,
    /// Residual arguments for non-GET requests.
    pub body: Option<Args>,
}

impl ResolvedRequest {
    /// A GET for an already resolved path (e.g. a pagination cursor URI).
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            body: None,
        }
    }

    /// The JSON body text; the same bytes are signed and sent.
    pub fn body_json(&self) -> Result<Option<String>> {
        self.body
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(CoinbaseError::from)
    }
}

/// Resolve a request's path template and place its residual arguments.
///
/// Fails with [`CoinbaseError::MissingPathArgument`] if a placeholder has no
/// argument. Arguments used in the path are not repeated in the query or
/// body. For GET, `null` arguments are left out of the query string.
pub fn resolve(spec: &RequestSpec) -> Result<ResolvedRequest> {
    let mut residual = spec.args.clone().unwrap_or_default();

    let segments = spec
        .path
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => residual
                .shift_remove(name)
                .map(|value| scalar_text(&value))
                .ok_or_else(|| CoinbaseError::MissingPathArgument(name.to_string())),
            None => Ok(segment.to_string()),
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let mut path = segments.join("/");

    let body = match spec.method {
        HttpMethod::Get => {
            let pairs: Vec<(&str, String)> = residual
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key.as_str(), scalar_text(value)))
                .collect();
            if !pairs.is_empty() {
                let query = serde_urlencoded::to_string(&pairs)
                    .map_err(|e| CoinbaseError::InvalidResponse(e.to_string()))?;
                path.push('?');
                path.push_str(&query);
            }
            None
        }
        _ => (!residual.is_empty()).then_some(residual),
    };

    Ok(ResolvedRequest {
        method: spec.method,
        path,
        body,
    })
}

/// Convert a serializable request struct into an argument bag.
///
/// The value must serialize to a JSON object; fields keep their
/// declaration order.
pub fn to_args<T>(value: &T) -> Result<Args>
where
    T: serde::Serialize + ?Sized,
{
    match serde_json::to_value(value)? {
        Value::Object(args) => Ok(args),
        Value::Null => Ok(Args::new()),
        other => Err(CoinbaseError::InvalidResponse(format!(
            "Request arguments must be an object, got {other}"
        ))),
    }
}

/// Text form of an argument as it appears in a path or query string.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
