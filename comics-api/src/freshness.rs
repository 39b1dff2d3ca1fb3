//! Conditional GET evaluation
//!
//! Compares a candidate `Last-Modified` timestamp with an incoming
//! `If-Modified-Since` header at one-second granularity.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, DurationRound, TimeDelta, Utc};

use crate::models::Comic;

/// IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Outcome of a conditional request
///
/// Both variants carry the formatted `Last-Modified` value to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    NotModified(String),
    Fresh(String),
}

impl Freshness {
    /// Decide whether the client's cached copy is still current
    ///
    /// ```rust
    /// use chrono::{TimeZone, Utc};
    /// use comics_api::freshness::Freshness;
    ///
    /// let modified = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    /// let decision = Freshness::evaluate(modified, Some("Mon, 01 Jan 2024 12:00:00 GMT"));
    /// assert!(decision.is_not_modified());
    ///
    /// let decision = Freshness::evaluate(modified, Some("Mon, 01 Jan 2024 11:59:59 GMT"));
    /// assert!(!decision.is_not_modified());
    /// ```
    pub fn evaluate(last_modified: DateTime<Utc>, if_modified_since: Option<&str>) -> Self {
        let last_modified = truncate_to_seconds(last_modified);
        let formatted = format_http_date(last_modified);

        match if_modified_since.and_then(parse_http_date) {
            Some(since) if since >= last_modified => Self::NotModified(formatted),
            _ => Self::Fresh(formatted),
        }
    }

    /// Evaluate against the request's `If-Modified-Since` header
    pub fn from_headers(last_modified: DateTime<Utc>, headers: &HeaderMap) -> Self {
        let since = headers
            .get(header::IF_MODIFIED_SINCE)
            .and_then(|value| value.to_str().ok());
        Self::evaluate(last_modified, since)
    }

    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::NotModified(_))
    }

    /// The `Last-Modified` header value
    pub fn last_modified(&self) -> &str {
        match self {
            Self::NotModified(value) | Self::Fresh(value) => value,
        }
    }
}

/// Candidate timestamp for a collection page
///
/// The most recent `updated_at` in the slice, or now when it is empty.
pub fn collection_last_modified(items: &[Comic]) -> DateTime<Utc> {
    items
        .iter()
        .map(|comic| comic.updated_at)
        .max()
        .unwrap_or_else(Utc::now)
}

pub fn format_http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format(HTTP_DATE_FORMAT).to_string()
}

/// Parse an HTTP date; `None` when the value is not a date
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn truncate_to_seconds(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp
        .duration_trunc(TimeDelta::seconds(1))
        .unwrap_or(timestamp)
}
