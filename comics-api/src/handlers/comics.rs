//! Comic collection handlers
//!
//! Each handler is generic over the comic store and terminates on the first
//! failing step; errors are converted to [`ApiError`] at this boundary.

use std::str::FromStr;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
};

use super::error::{ApiError, ApiOperation};
use super::pagination::PagePlan;
use super::payload::{ComicPayload, ValidComic};
use super::query::{ListParams, ListQuery};
use super::response::{Capabilities, CollectionResponse, ComicResource, Conditional, ItemResponse};
use crate::assets::StoredImage;
use crate::freshness::{collection_last_modified, Freshness};
use crate::ids::ComicId;
use crate::links::{LinkBuilder, ResourceLinks};
use crate::models::{ComicReplacement, NewComic};
use crate::repository::ComicRepository;
use crate::state::AppState;

const ENTITY: &str = "Comic";

/// `GET /comics`: filter, paginate and conditionally return the collection
pub async fn list_comics<R: ComicRepository>(
    State(state): State<AppState<R>>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
) -> Result<Conditional<CollectionResponse>, ApiError> {
    let config = &state.config().comics;
    let params = ListParams::from_query_string(raw_query.as_deref().unwrap_or_default());
    let query = ListQuery::normalize(&params, config.default_limit);
    tracing::debug!(?query, "Listing comics");

    let total = state.comics().count(&query.filters).await?;
    let plan = PagePlan::new(&query, total);
    let items = state
        .comics()
        .find_all(&query.filters, plan.store_window())
        .await?;

    let freshness = Freshness::from_headers(collection_last_modified(&items), &headers);
    tracing::debug!(
        total,
        page = plan.page,
        returned = items.len(),
        not_modified = freshness.is_not_modified(),
        "Collection page resolved"
    );

    Ok(Conditional::from_freshness(
        freshness,
        config.cache_max_age(),
        || {
            let links = LinkBuilder::for_request(config, &headers);
            let filters = params.filter_pairs();
            let pagination = plan.result(items.len(), &filters, &links);
            let self_href = links.page(&filters, plan.page, plan.limit.as_bounded());

            CollectionResponse {
                items: items
                    .into_iter()
                    .map(|comic| ComicResource::summary(comic, &links))
                    .collect(),
                links: ResourceLinks::new(self_href, links.collection()),
                pagination,
            }
        },
    ))
}

/// `POST /comics`
pub async fn create_comic<R: ComicRepository>(
    State(state): State<AppState<R>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ItemResponse<ComicResource>, ApiError> {
    let valid = ComicPayload::from_body(&headers, &body).validate()?;
    let ValidComic {
        title,
        description,
        author,
        date,
        image,
    } = valid;

    let image = resolve_image(&state, image.as_deref()).await?;
    let data = NewComic {
        title,
        description,
        author,
        date,
        image: image.as_ref().map(|stored| stored.reference().to_string()),
    };

    let comic = match state.comics().create(data).await {
        Ok(comic) => comic,
        Err(e) => {
            discard_written(&state, image.as_ref()).await;
            return Err(e.into());
        }
    };

    tracing::info!(comic_id = %comic.id, "Comic created");
    let links = LinkBuilder::for_request(&state.config().comics, &headers);
    Ok(ItemResponse::created(ComicResource::full(comic, &links)))
}

/// `GET /comics/{id}`
pub async fn get_comic<R: ComicRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Conditional<ComicResource>, ApiError> {
    let id = parse_id(&raw_id, ApiOperation::Get)?;
    let comic = state
        .comics()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(ENTITY, raw_id.as_str()))?;

    let last_modified = comic.updated_at.max(comic.created_at);
    let freshness = Freshness::from_headers(last_modified, &headers);
    tracing::debug!(comic_id = %id, not_modified = freshness.is_not_modified(), "Comic resolved");

    let config = &state.config().comics;
    Ok(Conditional::from_freshness(
        freshness,
        config.cache_max_age(),
        || ComicResource::full(comic, &LinkBuilder::for_request(config, &headers)),
    ))
}

/// `PUT /comics/{id}`: replace every user-supplied field
///
/// An absent `image` keeps the stored reference.
pub async fn replace_comic<R: ComicRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<ItemResponse<ComicResource>, ApiError> {
    let valid = ComicPayload::from_body(&headers, &body)
        .validate()
        .map_err(|e| e.with_operation(ApiOperation::Replace))?;
    let id = parse_id(&raw_id, ApiOperation::Replace)?;

    if !state.comics().exists(&id).await? {
        return Err(not_found(&raw_id, ApiOperation::Replace));
    }

    let image = resolve_image(&state, valid.image.as_deref()).await?;
    let data = ComicReplacement {
        title: valid.title,
        description: valid.description,
        author: valid.author,
        date: valid.date,
        image: image.as_ref().map(|stored| stored.reference().to_string()),
    };

    let comic = match state.comics().update(&id, data).await {
        Ok(comic) => comic,
        Err(e) => {
            discard_written(&state, image.as_ref()).await;
            return Err(e.into());
        }
    };

    tracing::info!(comic_id = %comic.id, "Comic replaced");
    let links = LinkBuilder::for_request(&state.config().comics, &headers);
    Ok(ItemResponse::new(ComicResource::full(comic, &links)))
}

/// `DELETE /comics/{id}`
pub async fn delete_comic<R: ComicRepository>(
    State(state): State<AppState<R>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&raw_id, ApiOperation::Delete)?;

    if !state.comics().delete(&id).await? {
        return Err(not_found(&raw_id, ApiOperation::Delete));
    }

    tracing::info!(comic_id = %id, "Comic deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `OPTIONS /comics`
pub async fn collection_options() -> Capabilities {
    Capabilities::COLLECTION
}

/// `OPTIONS /comics/{id}`
pub async fn resource_options() -> Capabilities {
    Capabilities::RESOURCE
}

/// `GET|PUT|DELETE /comics/seed`: `seed` is not a comic id
pub async fn seed_path_not_found() -> ApiError {
    not_found("seed", ApiOperation::Get)
}

/// An id that cannot be a `ComicId` names no comic
fn parse_id(raw_id: &str, operation: ApiOperation) -> Result<ComicId, ApiError> {
    ComicId::from_str(raw_id).map_err(|e| {
        tracing::debug!(id = raw_id, error = %e, "Unparsable comic id");
        not_found(raw_id, operation)
    })
}

fn not_found(raw_id: &str, operation: ApiOperation) -> ApiError {
    ApiError::not_found(ENTITY, raw_id).with_operation(operation)
}

async fn resolve_image<R: ComicRepository>(
    state: &AppState<R>,
    image: Option<&str>,
) -> Result<Option<StoredImage>, ApiError> {
    match image {
        Some(value) => Ok(Some(state.assets().resolve(value).await?)),
        None => Ok(None),
    }
}

/// Remove an asset written for a request whose store write failed
async fn discard_written<R: ComicRepository>(state: &AppState<R>, image: Option<&StoredImage>) {
    if let Some(StoredImage::Written(reference)) = image {
        state.assets().remove(reference).await;
    }
}
