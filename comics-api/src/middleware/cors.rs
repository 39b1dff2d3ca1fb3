//! CORS policy for the comic routes
//!
//! Applied per method router in [`crate::routes`] before the `OPTIONS`
//! endpoints are added, so preflights reach the handlers that advertise
//! `Allow` while other responses still get CORS headers.

use tower_http::cors::CorsLayer;

/// Build the CORS layer for `middleware.cors_mode`
pub fn cors_layer(mode: &str) -> CorsLayer {
    match mode {
        "permissive" => CorsLayer::permissive(),
        "restrictive" | "disabled" => CorsLayer::new(),
        other => {
            tracing::warn!("Unknown CORS mode: {}, defaulting to permissive", other);
            CorsLayer::permissive()
        }
    }
}
