//! The trade query filter and its upstream parameter encoding.

use std::collections::BTreeSet;

use url::Url;

use crate::errors::{Error, Warning};
use crate::refdata::ReferenceData;

use super::common::{Direction, Granularity, Period, Transport, TRANSPORT_FIELDS};

/// Filter for a single trade data request.
///
/// Construct with [`TradeQuery::new`], refine with the `with_*` builders,
/// and pass to [`Client::get_exports`](crate::Client::get_exports) or
/// [`Client::get_imports`](crate::Client::get_imports). The API key is
/// the only required field.
#[derive(Clone, Debug, Default)]
pub struct TradeQuery {
    pub api_key: String,
    /// Partner country ISO code, matched case-insensitively against the
    /// country table. An unknown code drops the restriction with a
    /// warning rather than failing the request.
    pub country_iso: Option<String>,
    pub year: Option<String>,
    /// Month `1`-`12`, or `"*"` for all months.
    pub month: Option<String>,
    pub period: Period,
    pub granularity: Granularity,
    pub transport: Transport,
}

impl TradeQuery {
    /// Creates a query holding only the API key; everything else defaults.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            ..Self::default()
        }
    }

    pub fn with_country(mut self, iso_code: &str) -> Self {
        self.country_iso = Some(iso_code.to_string());
        self
    }

    pub fn with_year(mut self, year: &str) -> Self {
        self.year = Some(year.to_string());
        self
    }

    pub fn with_month(mut self, month: &str) -> Self {
        self.month = Some(month.to_string());
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.period = period;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Encodes this filter as upstream query parameters on `url`.
    ///
    /// Fails only on a missing API key. A country code that is not in the
    /// reference table and a month outside `1`-`12` both degrade with a
    /// warning instead of rejecting the request.
    pub(crate) fn add_to_url(
        &self,
        url: &Url,
        direction: Direction,
        refdata: &ReferenceData,
        warnings: &mut Vec<Warning>,
    ) -> Result<Url, Error> {
        if self.api_key.is_empty() {
            return Err(Error::MissingApiKey);
        }
        let mut url = url.clone();

        // The transport breakdown is always requested; whether it is kept
        // is decided during aggregation. The set de-duplicates the field
        // list before joining.
        let mut fields = BTreeSet::from(["CTY_NAME", direction.commodity_field(), direction.value_field()]);
        fields.extend(TRANSPORT_FIELDS);
        let get = fields.into_iter().collect::<Vec<_>>().join(",");

        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("COMM_LVL", "HS2")
            .append_pair("get", &get);

        if let Some(iso) = &self.country_iso {
            match refdata.country_code(iso) {
                Some(code) => {
                    url.query_pairs_mut().append_pair("CTY_CODE", code);
                }
                None => {
                    tracing::warn!("Country ISO code '{}' not found in the country table", iso);
                    warnings.push(Warning::UnknownCountry(iso.clone()));
                }
            }
        }
        if let Some(year) = &self.year {
            url.query_pairs_mut().append_pair("YEAR", year);
        }
        if let Some(month) = &self.month {
            url.query_pairs_mut()
                .append_pair("MONTH", &render_month(month, warnings));
        }
        Ok(url)
    }
}

/// `*` passes through, `1`-`12` is zero-padded to two digits, anything
/// else is sent verbatim with a warning.
fn render_month(month: &str, warnings: &mut Vec<Warning>) -> String {
    if month == "*" {
        return month.to_string();
    }
    match month.parse::<u32>() {
        Ok(m) if (1..=12).contains(&m) => format!("{:02}", m),
        _ => {
            tracing::warn!("Invalid month '{}', sending as is", month);
            warnings.push(Warning::InvalidMonth(month.to_string()));
            month.to_string()
        }
    }
}
