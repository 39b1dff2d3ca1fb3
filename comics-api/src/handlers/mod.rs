//! HTTP handlers for the comic collection
//!
//! A list request flows through the [`ListQuery`] normalizer, the
//! [`PagePlan`] engine, [`Freshness`](crate::freshness::Freshness) evaluation
//! and finally link building. Writes validate a [`ComicPayload`] first.
//!
//! # Integration with Axum
//!
//! Handlers are generic over the store and are mounted by
//! [`crate::routes::router`]:
//!
//! ```rust,no_run
//! use comics_api::{config::Config, routes::router, state::AppState};
//!
//! let app = router(AppState::in_memory(Config::default()));
//! ```

pub mod comics;
mod error;
mod pagination;
mod payload;
mod query;
mod response;

pub use error::{ApiError, ApiErrorKind, ApiErrorResponse, ApiOperation};
pub use pagination::{PageLink, PagePlan, PaginationLinks, PaginationResult};
pub use payload::{ComicPayload, ValidComic};
pub use query::{ListParams, ListQuery, PageLimit, FILTER_PARAMS};
pub use response::{Capabilities, CollectionResponse, ComicResource, Conditional, ItemResponse};
