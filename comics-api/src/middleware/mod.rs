//! Middleware for content negotiation, CORS and request tracking

pub mod accept;
pub mod cors;
pub mod request_tracking;

pub use accept::{accepts_json, require_json, JSON_MEDIA_TYPE};
pub use cors::cors_layer;
pub use request_tracking::{
    request_id_layer, request_id_propagation_layer, sensitive_headers_layer, SENSITIVE_HEADERS,
};
