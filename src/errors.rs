//! Error and diagnostic types for the API client.

/// Errors that can occur when building or executing a request.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No API key was supplied. The Census API rejects keyless requests.
    #[error("API key is required to access the U.S. Census Bureau API")]
    MissingApiKey,
    /// An HTTP request failed (connection error, timeout, or unreadable body).
    #[error("Request failed")]
    RequestFailed,
    /// The API returned a non-success status with a body snippet.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The response body was not the expected JSON array-of-arrays payload.
    /// Distinct from an empty result: the fetch as a whole failed.
    #[error("Failed to decode response: {detail}")]
    Decode { detail: String, body: String },
}

/// Non-fatal conditions that degrade a request without failing it.
///
/// Each warning is logged where it occurs and collected into the returned
/// [`TableResult`](crate::types::TableResult), so callers can see which
/// features were degraded without parsing log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Country ISO code not found in the country table; the request was
    /// sent without a country restriction.
    UnknownCountry(String),
    /// Month value that is neither `*` nor an integer 1-12; sent verbatim.
    InvalidMonth(String),
    /// Status 200 with an empty body.
    EmptyBody,
    /// A commodity reference table was missing or unusable; enrichment was
    /// skipped and the original commodity-code column kept.
    LookupUnavailable(String),
    /// Yearly rollup requested but the MONTH or YEAR column is absent.
    MissingPeriodColumns,
    /// Yearly rollup found no descriptive columns to group by.
    NoGroupingColumns,
    /// Yearly rollup found no value columns to sum; rows were de-duplicated
    /// instead.
    NoValueColumns,
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnknownCountry(iso) => {
                write!(f, "country ISO code '{}' not found in the country table", iso)
            }
            Warning::InvalidMonth(month) => write!(f, "invalid month '{}', sent as is", month),
            Warning::EmptyBody => write!(f, "received status 200 but no content"),
            Warning::LookupUnavailable(table) => {
                write!(f, "{} table not loaded, original commodity column kept", table)
            }
            Warning::MissingPeriodColumns => {
                write!(f, "MONTH or YEAR column not found for yearly aggregation")
            }
            Warning::NoGroupingColumns => {
                write!(f, "no grouping columns found for yearly aggregation")
            }
            Warning::NoValueColumns => {
                write!(f, "no value columns to sum for yearly aggregation")
            }
        }
    }
}
