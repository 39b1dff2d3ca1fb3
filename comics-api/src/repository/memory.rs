//! In-memory comic store
//!
//! Keeps comics in insertion order behind a `tokio::sync::RwLock`. Every
//! operation takes the lock once, so each call is atomic, but there are no
//! multi-call transactions.

use chrono::Utc;
use tokio::sync::RwLock;

use super::error::{RepositoryError, RepositoryOperation};
use super::pagination::{matches_all, FilterCondition, Pagination};
use super::traits::{Repository, RepositoryResult};
use crate::ids::ComicId;
use crate::models::{Comic, ComicReplacement, NewComic};

const ENTITY: &str = "Comic";

#[derive(Debug, Default)]
pub struct InMemoryComicStore {
    comics: RwLock<Vec<Comic>>,
}

impl InMemoryComicStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repository<ComicId, Comic, NewComic, ComicReplacement> for InMemoryComicStore {
    async fn find_by_id(&self, id: &ComicId) -> RepositoryResult<Option<Comic>> {
        let comics = self.comics.read().await;
        Ok(comics.iter().find(|comic| &comic.id == id).cloned())
    }

    async fn find_all(
        &self,
        filters: &[FilterCondition],
        pagination: Option<Pagination>,
    ) -> RepositoryResult<Vec<Comic>> {
        let comics = self.comics.read().await;
        let matching = comics.iter().filter(|comic| matches_all(filters, *comic));

        let page: Vec<Comic> = match pagination {
            Some(Pagination { offset, limit }) => matching
                .skip(usize::try_from(offset).unwrap_or(usize::MAX))
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };

        Ok(page)
    }

    async fn count(&self, filters: &[FilterCondition]) -> RepositoryResult<u64> {
        let comics = self.comics.read().await;
        let total = comics
            .iter()
            .filter(|comic| matches_all(filters, *comic))
            .count();
        Ok(total as u64)
    }

    async fn exists(&self, id: &ComicId) -> RepositoryResult<bool> {
        let comics = self.comics.read().await;
        Ok(comics.iter().any(|comic| &comic.id == id))
    }

    async fn create(&self, data: NewComic) -> RepositoryResult<Comic> {
        let now = Utc::now();
        let comic = Comic {
            id: ComicId::new(),
            title: data.title,
            description: data.description,
            author: data.author,
            date: data.date,
            image: data.image,
            created_at: now,
            updated_at: now,
        };

        self.comics.write().await.push(comic.clone());
        tracing::debug!(comic_id = %comic.id, "Comic stored");
        Ok(comic)
    }

    async fn update(&self, id: &ComicId, data: ComicReplacement) -> RepositoryResult<Comic> {
        let mut comics = self.comics.write().await;
        let comic = comics
            .iter_mut()
            .find(|comic| &comic.id == id)
            .ok_or_else(|| {
                RepositoryError::not_found(ENTITY, id.as_str())
                    .with_operation(RepositoryOperation::Update)
            })?;

        comic.title = data.title;
        comic.description = data.description;
        comic.author = data.author;
        comic.date = data.date;
        if let Some(image) = data.image {
            comic.image = Some(image);
        }
        // Clock skew must not move updated_at backwards
        comic.updated_at = Utc::now().max(comic.updated_at);

        Ok(comic.clone())
    }

    async fn delete(&self, id: &ComicId) -> RepositoryResult<bool> {
        let mut comics = self.comics.write().await;
        let before = comics.len();
        comics.retain(|comic| &comic.id != id);
        Ok(comics.len() < before)
    }

    async fn delete_all(&self) -> RepositoryResult<u64> {
        let mut comics = self.comics.write().await;
        let removed = comics.len() as u64;
        comics.clear();
        Ok(removed)
    }
}
