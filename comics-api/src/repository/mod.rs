//! Resource store abstraction
//!
//! - [`Repository`]: generic async CRUD trait
//! - [`FilterCondition`]: field predicates evaluated by the store
//! - [`Pagination`]: offset/limit window
//! - [`InMemoryComicStore`]: the store used by the service
//!
//! # Example
//!
//! ```rust
//! use comics_api::repository::{FilterCondition, InMemoryComicStore, Pagination, Repository};
//!
//! # async fn demo() -> Result<(), comics_api::repository::RepositoryError> {
//! let store = InMemoryComicStore::new();
//! let filters = [FilterCondition::contains_ignore_case("title", "saga")];
//! let total = store.count(&filters).await?;
//! let page = store.find_all(&filters, Some(Pagination::page(1, 6))).await?;
//! assert!(page.len() as u64 <= total);
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod pagination;
mod traits;

pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::InMemoryComicStore;
pub use pagination::{
    matches_all, FilterCondition, FilterOperator, FilterValue, Filterable, Pagination,
};
pub use traits::{Repository, RepositoryResult};

use crate::ids::ComicId;
use crate::models::{Comic, ComicReplacement, NewComic};

/// Any repository that can back the comic endpoints
pub trait ComicRepository:
    Repository<ComicId, Comic, NewComic, ComicReplacement> + 'static
{
}

impl<T> ComicRepository for T where
    T: Repository<ComicId, Comic, NewComic, ComicReplacement> + 'static
{
}
