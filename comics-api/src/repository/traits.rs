//! Repository trait definitions
//!
//! Async CRUD operations use RPITIT (Return Position Impl Trait In Traits), so
//! implementations can be written as plain `async fn` without `async_trait`.

use std::future::Future;

use super::error::RepositoryError;
use super::pagination::{FilterCondition, Pagination};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Base repository trait for CRUD operations
///
/// # Type Parameters
///
/// - `Id`: The identifier type for the entity (e.g. `ComicId`)
/// - `Entity`: The full entity type returned from queries
/// - `Create`: The data transfer object for creating new entities
/// - `Update`: The data transfer object for replacing existing entities
///
/// Each operation is atomic on its own. Sequences of calls are not.
pub trait Repository<Id, Entity, Create, Update>: Send + Sync {
    /// Find an entity by its unique identifier
    ///
    /// Returns `Ok(None)` when no entity has this id.
    fn find_by_id(&self, id: &Id) -> impl Future<Output = RepositoryResult<Option<Entity>>> + Send;

    /// Find all entities matching every filter, in a stable order
    ///
    /// `pagination` of `None` returns every match.
    fn find_all(
        &self,
        filters: &[FilterCondition],
        pagination: Option<Pagination>,
    ) -> impl Future<Output = RepositoryResult<Vec<Entity>>> + Send;

    /// Count entities matching every filter
    fn count(
        &self,
        filters: &[FilterCondition],
    ) -> impl Future<Output = RepositoryResult<u64>> + Send;

    /// Check if an entity exists by its identifier
    fn exists(&self, id: &Id) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Create a new entity, assigning its id and timestamps
    fn create(&self, data: Create) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Replace an existing entity
    ///
    /// # Errors
    ///
    /// Returns a `NotFound` error if the entity doesn't exist.
    fn update(
        &self,
        id: &Id,
        data: Update,
    ) -> impl Future<Output = RepositoryResult<Entity>> + Send;

    /// Delete an entity by its identifier
    ///
    /// Returns `true` if the entity was deleted, `false` if it didn't exist.
    fn delete(&self, id: &Id) -> impl Future<Output = RepositoryResult<bool>> + Send;

    /// Delete every entity, returning how many were removed
    fn delete_all(&self) -> impl Future<Output = RepositoryResult<u64>> + Send;
}
