//! Conversion-rate data model and the HTTP collaborator that serves it.
//!
//! The backend exposes `GET /conversion-rate?origin={origin}` returning a
//! per-origin [`ConversionData`] summary. The dashboard only ever talks to it
//! through the [`ConversionApi`] trait so tests can substitute a scripted
//! collaborator.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

use crate::http_client;

/// Traffic origin a conversion was attributed to.
///
/// The set is closed; variants serialize to the exact wire strings the
/// backend expects (case preserved).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    Email,
    Wpp,
    Mobile,
}

impl Origin {
    /// All known origins, in fixed display order.
    pub const ALL: [Origin; 3] = [Origin::Email, Origin::Wpp, Origin::Mobile];

    /// Wire value used in the query string and echoed back by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Email => "email",
            Origin::Wpp => "wpp",
            Origin::Mobile => "MOBILE",
        }
    }

    /// Human-facing label for selector buttons.
    pub fn label(self) -> &'static str {
        match self {
            Origin::Email => "Email",
            Origin::Wpp => "Wpp",
            Origin::Mobile => "MOBILE",
        }
    }
}

impl Default for Origin {
    fn default() -> Self {
        Origin::Email
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Funnel status code, restricted to the closed range 1 through 6.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Status(u8);

impl Status {
    /// All known statuses, in ascending order.
    pub const ALL: [Status; 6] = [
        Status(1),
        Status(2),
        Status(3),
        Status(4),
        Status(5),
        Status(6),
    ];

    /// Validate a raw code at the boundary; `None` outside 1..=6.
    pub fn new(code: u8) -> Option<Status> {
        (1..=6).contains(&code).then_some(Status(code))
    }

    /// The integer code carried on the wire.
    pub fn code(self) -> u8 {
        self.0
    }
}

impl Default for Status {
    fn default() -> Self {
        Status(4)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One funnel status's outcome for an origin.
///
/// `percentage` is decimal text as sent by the backend ("0".."100" expected,
/// unvalidated); parsing to a number is a presentation concern.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConversionRate {
    pub status: u8,
    pub count: u64,
    pub percentage: String,
}

/// Per-origin conversion summary returned by the backend.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionData {
    pub origin: String,
    pub total: u64,
    pub conversion_rates: Vec<ConversionRate>,
}

/// One row of the per-origin comparison for the selected status.
///
/// Derived, never persisted; origins with no entry for the status fall back
/// to percentage "0" and count 0.
#[derive(Clone, Debug, PartialEq)]
pub struct CombinedRow {
    pub origin: Origin,
    pub percentage: String,
    pub count: u64,
}

/// Errors from the conversion-rate collaborator.
///
/// The UI collapses these into a generic message; the detail is for logs.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
    /// Transport failure or non-2xx response.
    #[error("Request failed: {0}")]
    Http(String),
    /// The response body did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(String),
}

/// Data collaborator the dashboard fetches conversion summaries through.
pub trait ConversionApi: Send + Sync {
    /// Fetch the conversion summary for one origin.
    fn fetch(&self, origin: Origin) -> Result<ConversionData, ApiError>;
}

/// `ureq`-backed client for the live backend.
pub struct HttpConversionApi {
    base_url: String,
}

impl HttpConversionApi {
    /// Create a client rooted at `base_url` (trailing slashes ignored).
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }

    fn endpoint(&self, origin: Origin) -> String {
        format!("{}/conversion-rate?origin={}", self.base_url, origin.as_str())
    }
}

impl ConversionApi for HttpConversionApi {
    fn fetch(&self, origin: Origin) -> Result<ConversionData, ApiError> {
        let response = http_client::agent()
            .get(&self.endpoint(origin))
            .set("Accept", "application/json")
            .call()
            .map_err(|err| ApiError::Http(err.to_string()))?;
        response
            .into_json::<ConversionData>()
            .map_err(|err| ApiError::Decode(err.to_string()))
    }
}

/// Assemble one comparison row per origin for `status`, in fixed origin order.
///
/// First match wins among duplicate status entries; an origin without a
/// matching entry contributes the "0"/0 fallback row.
pub fn combined_rows(results: &[(Origin, ConversionData)], status: Status) -> Vec<CombinedRow> {
    results
        .iter()
        .map(|(origin, data)| {
            let matched = data
                .conversion_rates
                .iter()
                .find(|rate| rate.status == status.code());
            CombinedRow {
                origin: *origin,
                percentage: matched
                    .map(|rate| rate.percentage.clone())
                    .unwrap_or_else(|| "0".to_string()),
                count: matched.map(|rate| rate.count).unwrap_or(0),
            }
        })
        .collect()
}
