//! API error types for handler operations
//!
//! Every error renders as `{"error": <message>}` with the status of its kind.
//! Internal details are logged, never returned.
//!
//! # Example
//!
//! ```rust
//! use comics_api::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Comic", "comic_123");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.message, "Comic not found");
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::assets::AssetError;
use crate::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};

const INTERNAL_MESSAGE: &str = "Server error";

/// Operation being performed when the API error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    List,
    Get,
    Create,
    Replace,
    Delete,
    Seed,
    /// Content negotiation before any handler runs
    Negotiate,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Replace => write!(f, "replace"),
            Self::Delete => write!(f, "delete"),
            Self::Seed => write!(f, "seed"),
            Self::Negotiate => write!(f, "negotiate"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// No record with the requested id
    NotFound,
    /// A required field is missing or a payload is malformed
    ValidationFailed,
    /// `Accept` is not `application/json`
    NotAcceptable,
    /// Store or asset failure
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::NotAcceptable => write!(f, "not_acceptable"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::ValidationFailed => StatusCode::BAD_REQUEST,
            Self::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Message returned to the client
    pub message: String,
    /// Internal cause, logged but never returned
    pub detail: Option<String>,
    /// The type of entity involved (e.g. "Comic")
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            detail: None,
            entity_type: None,
            entity_id: None,
        }
    }

    /// `"<entity_type> not found"`
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        let entity_type = entity_type.into();
        Self {
            operation: ApiOperation::Get,
            kind: ApiErrorKind::NotFound,
            message: format!("{entity_type} not found"),
            detail: None,
            entity_type: Some(entity_type),
            entity_id: Some(entity_id.into()),
        }
    }

    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(
            ApiOperation::Create,
            ApiErrorKind::ValidationFailed,
            message,
        )
    }

    pub fn not_acceptable() -> Self {
        Self::new(
            ApiOperation::Negotiate,
            ApiErrorKind::NotAcceptable,
            "Webservice only supports json.",
        )
    }

    /// Generic server error; `detail` is only logged
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::new(
                ApiOperation::Get,
                ApiErrorKind::InternalError,
                INTERNAL_MESSAGE,
            )
        }
    }

    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();

        if self.kind == ApiErrorKind::InternalError {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                detail = ?self.detail,
                "API error: {}", self.message
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                kind = %self.kind,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        }

        let body = ApiErrorResponse {
            error: self.message,
        };

        (status, Json(body)).into_response()
    }
}

fn repository_operation_to_api_operation(op: RepositoryOperation) -> ApiOperation {
    match op {
        RepositoryOperation::FindById | RepositoryOperation::Exists => ApiOperation::Get,
        RepositoryOperation::FindAll | RepositoryOperation::Count => ApiOperation::List,
        RepositoryOperation::Create => ApiOperation::Create,
        RepositoryOperation::Update => ApiOperation::Replace,
        RepositoryOperation::Delete => ApiOperation::Delete,
        RepositoryOperation::DeleteAll => ApiOperation::Seed,
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        let operation = repository_operation_to_api_operation(err.operation);

        let mut api_error = match err.kind {
            RepositoryErrorKind::NotFound => Self::new(
                operation,
                ApiErrorKind::NotFound,
                format!(
                    "{} not found",
                    err.entity_type.as_deref().unwrap_or("Entity")
                ),
            ),
            RepositoryErrorKind::StorageError | RepositoryErrorKind::Other => {
                Self::internal(err.to_string()).with_operation(operation)
            }
        };
        api_error.entity_type = err.entity_type;
        api_error.entity_id = err.entity_id;
        api_error
    }
}

impl From<AssetError> for ApiError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::Decode(_) => Self::validation_failed(err.to_string()),
            AssetError::Write { .. } => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiErrorKind::ValidationFailed.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiErrorKind::NotAcceptable.status_code(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            ApiErrorKind::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display_with_entity() {
        let error = ApiError::not_found("Comic", "comic_123").with_operation(ApiOperation::Delete);
        assert_eq!(
            error.to_string(),
            "API not_found error during delete: Comic not found [Comic: comic_123]"
        );
    }

    #[test]
    fn test_from_repository_not_found() {
        let error: ApiError = RepositoryError::not_found("Comic", "comic_123")
            .with_operation(RepositoryOperation::Update)
            .into();
        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.operation, ApiOperation::Replace);
        assert_eq!(error.message, "Comic not found");
        assert_eq!(error.entity_id.as_deref(), Some("comic_123"));
    }

    #[test]
    fn test_from_repository_storage_hides_detail() {
        let error: ApiError =
            RepositoryError::storage(RepositoryOperation::Create, "disk on fire").into();
        assert_eq!(error.kind, ApiErrorKind::InternalError);
        assert_eq!(error.operation, ApiOperation::Create);
        assert_eq!(error.message, "Server error");
        assert!(error.detail.unwrap().contains("disk on fire"));
    }

    #[test]
    fn test_from_asset_error() {
        let decode = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, "!!")
            .unwrap_err();
        let error: ApiError = AssetError::Decode(decode).into();
        assert_eq!(error.kind, ApiErrorKind::ValidationFailed);

        let write = AssetError::Write {
            path: "public/images/x.png".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let error: ApiError = write.into();
        assert_eq!(error.kind, ApiErrorKind::InternalError);
        assert_eq!(error.message, "Server error");
    }

    #[tokio::test]
    async fn test_into_response_body_shape() {
        let response = ApiError::validation_failed("title is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "title is required" })
        );
    }

    #[tokio::test]
    async fn test_internal_response_does_not_leak() {
        let response = ApiError::internal("connection string secret").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, serde_json::json!({ "error": "Server error" }));
    }

    #[tokio::test]
    async fn test_not_acceptable_response() {
        let response = ApiError::not_acceptable().into_response();
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Webservice only supports json." })
        );
    }
}
