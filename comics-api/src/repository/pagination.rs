//! Pagination and filtering types for repository queries
//!
//! # Example
//!
//! ```rust
//! use comics_api::repository::{FilterCondition, Pagination};
//!
//! // Second page of four
//! let pagination = Pagination::page(2, 4);
//! assert_eq!(pagination.offset, 4);
//!
//! let filters = vec![
//!     FilterCondition::contains_ignore_case("title", "batman"),
//!     FilterCondition::never("date"),
//! ];
//! ```

use std::fmt;

use chrono::NaiveDate;

/// Offset/limit window over an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of results to skip
    pub offset: u64,
    /// Maximum number of results to return
    pub limit: u64,
}

impl Pagination {
    #[must_use]
    pub const fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Window for a 1-indexed page number
    ///
    /// ```rust
    /// use comics_api::repository::Pagination;
    ///
    /// let page3 = Pagination::page(3, 20);
    /// assert_eq!(page3.offset, 40);
    /// assert_eq!(page3.limit, 20);
    /// ```
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        let offset = page_number.saturating_sub(1).saturating_mul(page_size);
        Self {
            offset,
            limit: page_size,
        }
    }
}

/// Comparison operators for filter conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Exact equality
    Equal,
    /// Case-insensitive, unanchored substring match on text fields
    ContainsIgnoreCase,
    /// Matches nothing
    Never,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::ContainsIgnoreCase => write!(f, "ICONTAINS"),
            Self::Never => write!(f, "NEVER"),
        }
    }
}

/// A value that can be used in filter conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Text value
    String(String),
    /// Calendar date
    Date(NaiveDate),
    /// No value
    Null,
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// Exposes an entity's fields to [`FilterCondition::matches`]
///
/// Returning `None` for a field means the entity has no such field, and every
/// condition on it fails.
pub trait Filterable {
    fn field_value(&self, field: &str) -> Option<FilterValue>;
}

/// A single filter condition for querying entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Create a case-insensitive substring filter
    ///
    /// ```rust
    /// use comics_api::repository::{FilterCondition, FilterOperator};
    ///
    /// let filter = FilterCondition::contains_ignore_case("author", "MOORE");
    /// assert_eq!(filter.operator, FilterOperator::ContainsIgnoreCase);
    /// ```
    pub fn contains_ignore_case(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self::new(
            field,
            FilterOperator::ContainsIgnoreCase,
            FilterValue::String(needle.into()),
        )
    }

    /// Create a filter that rejects every entity
    pub fn never(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Never, FilterValue::Null)
    }

    /// Evaluate this condition against an entity
    pub fn matches<E: Filterable + ?Sized>(&self, entity: &E) -> bool {
        if self.operator == FilterOperator::Never {
            return false;
        }

        let Some(actual) = entity.field_value(&self.field) else {
            return false;
        };

        match (self.operator, &actual, &self.value) {
            (FilterOperator::Equal, actual, expected) => actual == expected,
            (
                FilterOperator::ContainsIgnoreCase,
                FilterValue::String(haystack),
                FilterValue::String(needle),
            ) => haystack.to_lowercase().contains(&needle.to_lowercase()),
            _ => false,
        }
    }
}

/// True when the entity satisfies every condition
pub fn matches_all<E: Filterable + ?Sized>(filters: &[FilterCondition], entity: &E) -> bool {
    filters.iter().all(|filter| filter.matches(entity))
}
