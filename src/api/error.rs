//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbError;
use crate::service::{AuthError, DocumentServiceError};

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Document not found (404)
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Artifact not found (404)
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Caller lacks the admin capability (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::DocumentNotFound(_) => "document_not_found",
            ApiError::ArtifactNotFound(_) => "artifact_not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Internal(_) => "internal_error",
            ApiError::Database(_) => "database_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::DocumentNotFound(_) | ApiError::ArtifactNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = self.error_type();

        if status.is_server_error() {
            tracing::error!(
                error_type = error_type,
                status = status.as_u16(),
                message = %self,
                "API error"
            );
        } else {
            tracing::debug!(
                error_type = error_type,
                status = status.as_u16(),
                message = %self,
                "API request rejected"
            );
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

/// Parse a numeric path id, rejecting anything else as a bad request
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("id must be numeric, got {:?}", raw)))
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<DocumentServiceError> for ApiError {
    fn from(err: DocumentServiceError) -> Self {
        match err {
            DocumentServiceError::DocumentNotFound(id) => ApiError::DocumentNotFound(id),
            DocumentServiceError::ArtifactNotFound(id) => ApiError::ArtifactNotFound(id),
            DocumentServiceError::Validation(msg) => ApiError::BadRequest(msg),
            DocumentServiceError::DbError(e) => e.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Forbidden(err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::Database(err.to_string())
    }
}
