//! Page arithmetic and pagination links
//!
//! Pure functions of a [`ListQuery`] and the store's match count.
//!
//! ```rust
//! use comics_api::handlers::{ListParams, ListQuery, PagePlan};
//!
//! let query = ListQuery::normalize(&ListParams::from_query_string("limit=4&page=2"), 6);
//! let plan = PagePlan::new(&query, 10);
//!
//! assert_eq!(plan.total_pages, 3);
//! assert_eq!(plan.previous(), Some(1));
//! assert_eq!(plan.next(), Some(3));
//! ```

use serde::Serialize;

use super::query::{ListQuery, PageLimit};
use crate::links::LinkBuilder;
use crate::repository::Pagination;

/// Paging decision for one list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    /// Requested page; not clamped to `total_pages`
    pub page: u32,
    pub limit: PageLimit,
    pub total_items: u64,
    /// Always at least 1
    pub total_pages: u32,
}

impl PagePlan {
    pub fn new(query: &ListQuery, total_items: u64) -> Self {
        match query.limit {
            PageLimit::Bounded(limit) => Self {
                page: query.page,
                limit: query.limit,
                total_items,
                total_pages: calculate_total_pages(total_items, limit),
            },
            // Everything fits on the one and only page
            PageLimit::Unbounded => Self {
                page: 1,
                limit: PageLimit::Unbounded,
                total_items,
                total_pages: 1,
            },
        }
    }

    /// Window to request from the store; `None` fetches every match
    pub fn store_window(&self) -> Option<Pagination> {
        self.limit
            .as_bounded()
            .map(|limit| Pagination::page(u64::from(self.page), u64::from(limit)))
    }

    pub fn previous(&self) -> Option<u32> {
        (self.page > 1).then(|| self.page - 1)
    }

    pub fn next(&self) -> Option<u32> {
        (self.page < self.total_pages).then(|| self.page + 1)
    }

    /// Build the `pagination` block for a page holding `current_item_count` items
    ///
    /// Each link repeats the request's raw filter parameters.
    pub fn result(
        &self,
        current_item_count: usize,
        filters: &[(&str, &str)],
        links: &LinkBuilder,
    ) -> PaginationResult {
        let limit = self.limit.as_bounded();
        let link = |page: u32| PageLink {
            page,
            href: links.page(filters, page, limit),
        };

        PaginationResult {
            current_page: self.page,
            current_item_count,
            total_pages: self.total_pages,
            total_items: self.total_items,
            limit,
            links: PaginationLinks {
                first: link(1),
                last: link(self.total_pages),
                previous: self.previous().map(link),
                next: self.next().map(link),
            },
        }
    }
}

/// Calculate total pages, rounding up; an empty set still has one page
fn calculate_total_pages(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: u32,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationLinks {
    pub first: PageLink,
    pub last: PageLink,
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult {
    pub current_page: u32,
    pub current_item_count: usize,
    pub total_pages: u32,
    pub total_items: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "_links")]
    pub links: PaginationLinks,
}
