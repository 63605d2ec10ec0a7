//! HTTP client for the Census Bureau international trade API.

use url::Url;

use crate::{
    aggregate, decode,
    errors::Error,
    query::{Direction, TradeQuery},
    refdata::ReferenceData,
    types::TableResult,
};

/// Identifies this crate to api.census.gov.
const USER_AGENT: &str = concat!("ustrade/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Census Bureau international trade time-series API.
///
/// Holds the reference tables used for country filtering and commodity
/// enrichment; the bundle is immutable after construction, so one client
/// can serve any number of concurrent callers. Each request builds a
/// fresh `reqwest::Client`. Retry and timeout policy is left to the
/// caller.
pub struct Client {
    /// Base URL for the API. Defaults to `https://api.census.gov`.
    base_api_url: String,
    refdata: ReferenceData,
}

impl Client {
    /// Creates a client pointing at the production Census API.
    pub fn new(refdata: ReferenceData) -> Self {
        Self {
            base_api_url: "https://api.census.gov".to_string(),
            refdata,
        }
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str, refdata: ReferenceData) -> Self {
        Self {
            base_api_url: base_url.to_string(),
            refdata,
        }
    }

    /// Fetches and reshapes export rows matching the given query.
    pub async fn get_exports(&self, query: &TradeQuery) -> Result<TableResult, Error> {
        self.fetch(Direction::Exports, query).await
    }

    /// Fetches and reshapes import rows matching the given query.
    pub async fn get_imports(&self, query: &TradeQuery) -> Result<TableResult, Error> {
        self.fetch(Direction::Imports, query).await
    }

    async fn fetch(&self, direction: Direction, query: &TradeQuery) -> Result<TableResult, Error> {
        let mut warnings = Vec::new();

        let url = Url::parse(format!("{}{}", &self.base_api_url, direction.path()).as_str())
            .map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::RequestFailed
            })?;
        let url = query.add_to_url(&url, direction, &self.refdata, &mut warnings)?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("An error occurred while fetching {} data: {}", direction, e);
                Error::RequestFailed
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read {} response body: {}", direction, e);
            Error::RequestFailed
        })?;

        let table = decode::decode_response(status, &body, direction, &mut warnings)?;
        if table.is_empty() {
            // Nothing to reshape; hand back the zero-row table as is.
            return Ok(TableResult { table, warnings });
        }

        let table = aggregate::process(table, query, direction, &self.refdata, &mut warnings);
        Ok(TableResult { table, warnings })
    }
}
