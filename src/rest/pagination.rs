//! Cursor pagination for list endpoints.
//!
//! Every list response carries a [`Pagination`] object next to its `data`
//! array. A [`PaginatedResult`] is an immutable snapshot of one page: moving
//! forward or backward yields a new instance built from the server supplied
//! `next_uri` / `previous_uri`, the current one is never modified.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;
use crate::rest::CoinbaseRestClient;
use crate::rest::request::ResolvedRequest;

/// Sort order of a paginated collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Pagination cursor returned with every list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pagination {
    /// Id of the first resource of this page, as sent for backward paging
    pub ending_before: Option<String>,
    /// Id of the last resource of this page, as sent for forward paging
    pub starting_after: Option<String>,
    /// Page size
    pub limit: u32,
    /// Sort order of the collection
    pub order: SortOrder,
    /// URI of the previous page, `None` on the first page
    pub previous_uri: Option<String>,
    /// URI of the next page, `None` on the last page
    pub next_uri: Option<String>,
}

/// One page of a list endpoint plus the cursor needed to reach its neighbours.
///
/// # Example
///
/// ```rust,no_run
/// use coinbase_api_client::auth::AuthConfig;
/// use coinbase_api_client::rest::CoinbaseRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = CoinbaseRestClient::builder()
///         .auth(AuthConfig::api_key("key", "secret"))
///         .build();
///
///     let mut page = client.list_accounts(None).await?;
///     loop {
///         for account in page.iter() {
///             println!("{}: {}", account.name, account.balance);
///         }
///         match page.fetch_next().await? {
///             Some(next) => page = next,
///             None => break,
///         }
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct PaginatedResult<T> {
    data: Vec<T>,
    pagination: Pagination,
    client: CoinbaseRestClient,
    auth_required: bool,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(
        data: Vec<T>,
        pagination: Pagination,
        client: CoinbaseRestClient,
        auth_required: bool,
    ) -> Self {
        Self {
            data,
            pagination,
            client,
            auth_required,
        }
    }

    /// Records of this page.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Take the records of this page.
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// The cursor of this page.
    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Sort order declared by the server.
    pub fn order(&self) -> SortOrder {
        self.pagination.order
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.pagination.next_uri.is_some()
    }

    /// Whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.pagination.previous_uri.is_some()
    }
}

impl<T> PaginatedResult<T>
where
    T: DeserializeOwned,
{
    /// Fetch the next page, or `None` if this is the last one.
    ///
    /// No request is made when there is no next page.
    pub async fn fetch_next(&self) -> Result<Option<Self>> {
        self.fetch_uri(self.pagination.next_uri.as_deref()).await
    }

    /// Fetch the previous page, or `None` if this is the first one.
    pub async fn fetch_previous(&self) -> Result<Option<Self>> {
        self.fetch_uri(self.pagination.previous_uri.as_deref())
            .await
    }

    /// Walk forward from this page and collect every remaining record.
    pub async fn collect_all(self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        let mut page = self;
        loop {
            let next = page.fetch_next().await?;
            records.append(&mut page.data);
            match next {
                Some(next) => page = next,
                None => return Ok(records),
            }
        }
    }

    async fn fetch_uri(&self, uri: Option<&str>) -> Result<Option<Self>> {
        let Some(uri) = uri else {
            return Ok(None);
        };
        let request = ResolvedRequest::get(request_path(uri)?);
        self.client
            .fetch_page(&request, self.auth_required)
            .await
            .map(Some)
    }
}

impl<T> Deref for PaginatedResult<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for PaginatedResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginatedResult")
            .field("data", &self.data)
            .field("pagination", &self.pagination)
            .finish()
    }
}

/// Path (with query) of a cursor URI, relative to the API base URL.
///
/// Absolute URIs are reduced to their path and query so that requests, and
/// the credentials attached to them, only ever go to the configured base URL.
fn request_path(uri: &str) -> Result<String> {
    if uri.starts_with('/') {
        return Ok(uri.to_string());
    }
    match Url::parse(uri) {
        Ok(url) => Ok(match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        }),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(format!("/{uri}")),
        Err(e) => Err(e.into()),
    }
}
