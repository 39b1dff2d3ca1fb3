//! Router assembly
//!
//! The JSON API lives under the configured mount path behind the `Accept`
//! gate. Everything else falls through to the static asset directory.
//!
//! CORS wraps each method router before its `OPTIONS` endpoint is added, so
//! preflights are answered by the handlers that advertise `Allow`.

use std::convert::Infallible;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::Layer;
use tower_http::services::ServeDir;

use crate::handlers::comics::{
    collection_options, create_comic, delete_comic, get_comic, list_comics, replace_comic,
    resource_options, seed_path_not_found,
};
use crate::middleware::{cors_layer, require_json};
use crate::repository::ComicRepository;
use crate::seed::seed_comics;
use crate::state::AppState;

/// Build the complete application router
pub fn router<R: ComicRepository>(state: AppState<R>) -> Router {
    let mount = state.config().comics.normalized_mount_path();
    let base = mount.trim_end_matches('/');
    let collection = if base.is_empty() { "/" } else { base };
    let cors = cors_layer(&state.config().middleware.cors_mode);
    let assets = cors.layer(ServeDir::new(state.assets().assets_dir()));

    tracing::debug!(collection, "Mounting comic routes");

    Router::new()
        .route(
            collection,
            get(list_comics::<R>)
                .post(create_comic::<R>)
                .layer::<_, Infallible>(cors.clone())
                .options(collection_options),
        )
        // A static segment wins over `{id}`; other methods still see "not found"
        .route(
            &format!("{base}/seed"),
            post(seed_comics::<R>)
                .get(seed_path_not_found)
                .put(seed_path_not_found)
                .delete(seed_path_not_found)
                .layer::<_, Infallible>(cors.clone()),
        )
        .route(
            &format!("{base}/{{id}}"),
            get(get_comic::<R>)
                .put(replace_comic::<R>)
                .delete(delete_comic::<R>)
                .layer::<_, Infallible>(cors)
                .options(resource_options),
        )
        .route_layer(middleware::from_fn(require_json))
        .with_state(state)
        .fallback_service(assets)
}
