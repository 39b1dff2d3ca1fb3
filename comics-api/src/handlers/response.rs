//! Response types for the comic endpoints
//!
//! - [`ComicResource`]: one comic with its `_links`
//! - [`CollectionResponse`]: `{items, _links, pagination}`
//! - [`ItemResponse`]: JSON body with a chosen status
//! - [`Conditional`]: a GET body gated by [`Freshness`]
//! - [`Capabilities`]: `OPTIONS` discovery response

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::pagination::PaginationResult;
use crate::freshness::Freshness;
use crate::ids::ComicId;
use crate::links::{LinkBuilder, ResourceLinks};
use crate::models::Comic;

/// Wire representation of a comic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComicResource {
    pub id: ComicId,
    pub title: String,
    /// Omitted in list views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub author: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "_links")]
    pub links: ResourceLinks,
}

impl ComicResource {
    /// Full record, as returned by single-comic endpoints
    pub fn full(comic: Comic, links: &LinkBuilder) -> Self {
        let links = links.resource_links(&comic.id);
        Self {
            id: comic.id,
            title: comic.title,
            description: Some(comic.description),
            author: comic.author,
            date: comic.date,
            image: comic.image,
            created_at: comic.created_at,
            updated_at: comic.updated_at,
            links,
        }
    }

    /// List-view record without `description`
    pub fn summary(comic: Comic, links: &LinkBuilder) -> Self {
        Self {
            description: None,
            ..Self::full(comic, links)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionResponse {
    pub items: Vec<ComicResource>,
    #[serde(rename = "_links")]
    pub links: ResourceLinks,
    pub pagination: PaginationResult,
}

/// JSON body with an explicit status code
#[derive(Debug, Clone)]
pub struct ItemResponse<T> {
    pub status: StatusCode,
    pub data: T,
}

impl<T> ItemResponse<T> {
    /// 200 OK
    pub fn new(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    /// 201 Created
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ItemResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self.data)).into_response()
    }
}

/// Conditional GET response
///
/// `NotModified` is a bodiless 304; `Fresh` carries the body with
/// `Last-Modified` and `Cache-Control`. Both allow any origin.
#[derive(Debug, Clone)]
pub enum Conditional<T> {
    NotModified { last_modified: String },
    Fresh {
        body: T,
        last_modified: String,
        max_age: Duration,
    },
}

impl<T> Conditional<T> {
    /// Build the body only when the decision is `Fresh`
    pub fn from_freshness(
        freshness: Freshness,
        max_age: Duration,
        body: impl FnOnce() -> T,
    ) -> Self {
        match freshness {
            Freshness::NotModified(last_modified) => Self::NotModified { last_modified },
            Freshness::Fresh(last_modified) => Self::Fresh {
                body: body(),
                last_modified,
                max_age,
            },
        }
    }
}

impl<T: Serialize> IntoResponse for Conditional<T> {
    fn into_response(self) -> Response {
        let (mut response, last_modified) = match self {
            Self::NotModified { last_modified } => {
                (StatusCode::NOT_MODIFIED.into_response(), last_modified)
            }
            Self::Fresh {
                body,
                last_modified,
                max_age,
            } => {
                let mut response = Json(body).into_response();
                let cache_control = format!("public, max-age={}", max_age.as_secs());
                if let Ok(value) = HeaderValue::from_str(&cache_control) {
                    response.headers_mut().insert(header::CACHE_CONTROL, value);
                }
                (response, last_modified)
            }
        };

        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&last_modified) {
            headers.insert(header::LAST_MODIFIED, value);
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        response
    }
}

/// `OPTIONS` response advertising the allowed methods
///
/// Also serves as the CORS preflight answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub methods: &'static str,
}

impl Capabilities {
    pub const COLLECTION: Self = Self {
        methods: "GET, POST, OPTIONS",
    };
    pub const RESOURCE: Self = Self {
        methods: "GET, PUT, DELETE, OPTIONS",
    };
}

impl IntoResponse for Capabilities {
    fn into_response(self) -> Response {
        let methods = HeaderValue::from_static(self.methods);
        (
            StatusCode::NO_CONTENT,
            [
                (header::ALLOW, methods.clone()),
                (header::ACCESS_CONTROL_ALLOW_METHODS, methods),
                (
                    header::ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type, Accept"),
                ),
                (
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ),
            ],
        )
            .into_response()
    }
}
