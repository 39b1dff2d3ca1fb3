//! Query normalization for the comic collection
//!
//! Raw query parameters never fail a request: every malformed value degrades
//! to a default.
//!
//! # Example
//!
//! ```rust
//! use comics_api::handlers::{ListParams, ListQuery, PageLimit};
//!
//! let params = ListParams::from_query_string("title=saga&page=2&limit=4");
//! let query = ListQuery::normalize(&params, 6);
//!
//! assert_eq!(query.page, 2);
//! assert_eq!(query.limit, PageLimit::Bounded(4));
//! assert_eq!(query.skip(), 4);
//! assert_eq!(query.filters.len(), 1);
//! ```

use chrono::{DateTime, NaiveDate};

use crate::repository::FilterCondition;

/// Filter parameters, in the order they are echoed into links
pub const FILTER_PARAMS: [&str; 3] = ["title", "author", "date"];

/// Query parameters of a list request, verbatim as received
///
/// When a parameter is repeated, the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub title: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    /// Parse a raw (still percent-encoded) query string
    pub fn from_query_string(raw: &str) -> Self {
        let mut params = Self::default();

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "title" => &mut params.title,
                "author" => &mut params.author,
                "date" => &mut params.date,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }

    /// Active filter parameters as `(name, raw value)` pairs in link order
    pub fn filter_pairs(&self) -> Vec<(&'static str, &str)> {
        FILTER_PARAMS
            .iter()
            .zip([&self.title, &self.author, &self.date])
            .filter_map(|(name, value)| value.as_deref().map(|v| (*name, v)))
            .collect()
    }
}

/// Page size of a list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLimit {
    /// At most this many items per page (always > 0)
    Bounded(u32),
    /// Every match on a single page
    Unbounded,
}

impl PageLimit {
    pub fn as_bounded(self) -> Option<u32> {
        match self {
            Self::Bounded(limit) => Some(limit),
            Self::Unbounded => None,
        }
    }
}

/// Typed descriptor of a list request
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<FilterCondition>,
    /// 1-indexed page number
    pub page: u32,
    pub limit: PageLimit,
}

impl ListQuery {
    /// Build the descriptor from raw parameters
    ///
    /// `default_limit` is used when `limit` is present but not a positive integer.
    pub fn normalize(params: &ListParams, default_limit: u32) -> Self {
        let mut filters = Vec::new();

        if let Some(title) = &params.title {
            filters.push(FilterCondition::contains_ignore_case("title", title.as_str()));
        }
        if let Some(author) = &params.author {
            filters.push(FilterCondition::contains_ignore_case("author", author.as_str()));
        }
        if let Some(date) = &params.date {
            filters.push(match parse_date(date) {
                Some(date) => FilterCondition::eq("date", date),
                None => FilterCondition::never("date"),
            });
        }

        let page = params
            .page
            .as_deref()
            .and_then(parse_positive)
            .unwrap_or(1);

        // Presence of `limit`, not its value, switches paging on
        let limit = match params.limit.as_deref() {
            None => PageLimit::Unbounded,
            Some(raw) => PageLimit::Bounded(parse_positive(raw).unwrap_or(default_limit.max(1))),
        };

        Self {
            filters,
            page,
            limit,
        }
    }

    /// Number of matches skipped before this page
    pub fn skip(&self) -> u64 {
        match self.limit {
            PageLimit::Bounded(limit) => u64::from(self.page - 1) * u64::from(limit),
            PageLimit::Unbounded => 0,
        }
    }
}

/// Parse a strictly positive integer, tolerating surrounding whitespace
fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (its date part)
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::FilterOperator;

    fn normalize(raw: &str) -> ListQuery {
        ListQuery::normalize(&ListParams::from_query_string(raw), 6)
    }

    #[test]
    fn test_empty_query_is_unbounded_first_page() {
        let query = normalize("");
        assert!(query.filters.is_empty());
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, PageLimit::Unbounded);
        assert_eq!(query.skip(), 0);
    }

    #[test]
    fn test_limit_presence_enables_paging() {
        assert_eq!(normalize("limit=4").limit, PageLimit::Bounded(4));
        assert_eq!(normalize("limit=").limit, PageLimit::Bounded(6));
        assert_eq!(normalize("limit=abc").limit, PageLimit::Bounded(6));
        assert_eq!(normalize("limit=0").limit, PageLimit::Bounded(6));
        assert_eq!(normalize("limit=-3").limit, PageLimit::Bounded(6));
    }

    #[test]
    fn test_invalid_page_defaults_to_one() {
        assert_eq!(normalize("page=3").page, 3);
        assert_eq!(normalize("page=0").page, 1);
        assert_eq!(normalize("page=-1").page, 1);
        assert_eq!(normalize("page=two").page, 1);
        assert_eq!(normalize("page=1.5").page, 1);
    }

    #[test]
    fn test_skip_uses_page_and_limit() {
        assert_eq!(normalize("page=2&limit=4").skip(), 4);
        assert_eq!(normalize("page=3&limit=4").skip(), 8);
        // Page is ignored when unbounded
        assert_eq!(normalize("page=3").skip(), 0);
    }

    #[test]
    fn test_text_filters_are_substring_ignore_case() {
        let query = normalize("title=Dark%20Knight&author=miller");
        assert_eq!(
            query.filters,
            vec![
                FilterCondition::contains_ignore_case("title", "Dark Knight"),
                FilterCondition::contains_ignore_case("author", "miller"),
            ]
        );
    }

    #[test]
    fn test_date_filter() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            normalize("date=2024-01-01").filters,
            vec![FilterCondition::eq("date", expected)]
        );
        assert_eq!(
            normalize("date=2024-01-01T10:00:00Z").filters,
            vec![FilterCondition::eq("date", expected)]
        );
    }

    #[test]
    fn test_unparsable_date_matches_nothing() {
        let query = normalize("date=yesterday");
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[0].operator, FilterOperator::Never);
    }

    #[test]
    fn test_first_occurrence_wins_and_unknown_params_ignored() {
        let params = ListParams::from_query_string("page=2&page=5&sort=title&title=a&title=b");
        assert_eq!(params.page.as_deref(), Some("2"));
        assert_eq!(params.title.as_deref(), Some("a"));
    }

    #[test]
    fn test_filter_pairs_keep_raw_values_in_order() {
        let params = ListParams::from_query_string("date=not-a-date&title=X+Men&page=2");
        assert_eq!(
            params.filter_pairs(),
            vec![("title", "X Men"), ("date", "not-a-date")]
        );
    }
}
