//! # HTTP errors
//!
//! Every handler returns `Result<_, ApiError>`. The response body is always
//!
//! ```json
//! { "success": false, "message": "...", "errors": [ ... ] }
//! ```
//!
//! with `errors` present only for validation failures. Database and store
//! internals are logged with `tracing` and replaced by a generic message.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

use crate::store::StoreError;
use crate::validation::{ValidationError, ValidationErrors};

const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub enum ApiError {
    /// 404 Not Found
    NotFound { message: String },

    /// 400 Bad Request, caused by the client's input
    BadRequest { message: String },

    /// 422 Unprocessable Entity
    ValidationFailed { errors: ValidationErrors },

    /// 500, details logged only
    Database { internal: DbErr },

    /// 500, details logged only
    Internal { internal: Option<String> },
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation_failed(errors: ValidationErrors) -> Self {
        Self::ValidationFailed { errors }
    }

    #[must_use]
    pub fn database(err: DbErr) -> Self {
        Self::Database { internal: err }
    }

    #[must_use]
    pub fn internal(internal: Option<String>) -> Self {
        Self::Internal { internal }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The sanitized message sent to the client.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound { message } | Self::BadRequest { message } => message.clone(),
            Self::ValidationFailed { errors } => {
                let messages = errors.messages();
                if messages.len() == 1 {
                    messages[0].clone()
                } else {
                    format!("Validation failed: {}", messages.join(", "))
                }
            }
            Self::Database { .. } | Self::Internal { .. } => INTERNAL_MESSAGE.to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Database { internal } => {
                tracing::error!(error = ?internal, "Database error occurred");
            }
            Self::Internal {
                internal: Some(details),
            } => {
                tracing::error!(details = %details, "Internal error occurred");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "API error"
                );
            }
        }
    }
}

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let errors = match &self {
            Self::ValidationFailed { errors } => Some(errors.errors().to_vec()),
            _ => None,
        };
        let body = ErrorResponse {
            success: false,
            message: self.user_message(),
            errors,
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(message) => Self::NotFound { message },
            err => Self::Database { internal: err },
        }
    }
}

/// Client mistakes in the query become 400; everything else is ours.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownField(_)
            | StoreError::InvalidValue { .. }
            | StoreError::MixedProjection => Self::BadRequest {
                message: err.to_string(),
            },
            StoreError::Database(internal) => Self::from(internal),
            StoreError::MissingTextIndex | StoreError::Serialization(_) => Self::Internal {
                internal: Some(err.to_string()),
            },
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationFailed { errors }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            message: rejection.body_text(),
        }
    }
}

/// A path segment that does not parse (a malformed id) names no resource.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Path rejected");
        Self::NotFound {
            message: "Resource not found. Invalid id".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found() {
        let err = ApiError::not_found("Job not found");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Job not found");
    }

    #[test]
    fn test_validation_failed_single_error() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("title", "Please enter a Job title."));
        let err = ApiError::validation_failed(errors);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.user_message(), "Please enter a Job title.");
    }

    #[test]
    fn test_validation_failed_multiple_errors() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("title", "Please enter a Job title."));
        errors.add(ValidationError::new("address", "Please enter an address."));
        let err = ApiError::from(errors);
        assert_eq!(
            err.user_message(),
            "Validation failed: Please enter a Job title., Please enter an address."
        );
    }

    #[test]
    fn test_database_error_is_sanitized() {
        let err = ApiError::from(DbErr::Custom("secret connection string".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_record_not_found_maps_to_404() {
        let err = ApiError::from(DbErr::RecordNotFound("Job not found".to_string()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_errors_from_the_query_are_bad_requests() {
        let unknown = ApiError::from(StoreError::UnknownField("password".to_string()));
        assert_eq!(unknown.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(unknown.user_message(), "Unknown field 'password'");

        let mixed = ApiError::from(StoreError::MixedProjection);
        assert_eq!(mixed.status_code(), StatusCode::BAD_REQUEST);

        let invalid = ApiError::from(StoreError::InvalidValue {
            field: "salary".to_string(),
            value: "lots".to_string(),
        });
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_missing_text_index_is_internal() {
        let err = ApiError::from(StoreError::MissingTextIndex);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), INTERNAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_response_envelope() {
        let mut errors = ValidationErrors::new();
        errors.add(ValidationError::new("email", "Please enter a valid email id."));
        let response = ApiError::validation_failed(errors).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Please enter a valid email id.");
        assert_eq!(json["errors"][0]["field"], "email");
    }
}
