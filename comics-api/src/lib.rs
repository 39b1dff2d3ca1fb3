//! # comics-api
//!
//! Hypermedia JSON API for a comic collection.
//!
//! ## Features
//!
//! - **Collection resource**: filtering on title, author and date with page/limit paging
//! - **Hypermedia links**: `self`, `collection`, `first`, `last`, `previous` and `next`
//! - **Conditional GET**: `Last-Modified` / `If-Modified-Since` with `304 Not Modified`
//! - **Image uploads**: base64 data URLs stored under the static asset directory
//! - **Seeding**: reset the collection with generated comics
//! - **Middleware stack**: request ids, panic recovery, body limits, timeouts, CORS
//!
//! ## Example
//!
//! ```rust,no_run
//! use comics_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let app = router(AppState::in_memory(config.clone()));
//!
//!     Server::new(config).serve(app).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod config;
pub mod error;
pub mod freshness;
pub mod handlers;
pub mod ids;
pub mod links;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repository;
pub mod routes;
pub mod seed;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assets::{AssetError, AssetStore, StoredImage};
    pub use crate::config::{ComicsConfig, Config, MiddlewareConfig, ServiceConfig};
    pub use crate::error::{Error, Result};
    pub use crate::freshness::Freshness;
    pub use crate::handlers::{
        ApiError, ApiErrorKind, ApiOperation, CollectionResponse, ComicResource, ItemResponse,
        PaginationResult,
    };
    pub use crate::ids::{ComicId, IdError, MakeTypedRequestId, RequestId};
    pub use crate::links::LinkBuilder;
    pub use crate::middleware::{
        cors_layer, request_id_layer, request_id_propagation_layer, require_json,
        sensitive_headers_layer, SENSITIVE_HEADERS,
    };
    pub use crate::models::{Comic, ComicReplacement, NewComic};
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        ComicRepository, FilterCondition, InMemoryComicStore, Pagination, Repository,
        RepositoryError, RepositoryErrorKind, RepositoryResult,
    };
    pub use crate::routes::router;
    pub use crate::server::Server;
    pub use crate::state::{AppState, AppStateBuilder};
}
