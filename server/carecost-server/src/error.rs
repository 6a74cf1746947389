use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use error_common::codes;
use liability_engine::LiabilityError;
use price_catalog::CatalogError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error category
    #[schema(example = "validation_error")]
    pub error_type: String,
    /// Stable error code
    #[schema(example = "VALIDATION_1002")]
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field-specific validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Suggested actions for resolving the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Standard API success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: &'static str,
        field_errors: Option<HashMap<String, Vec<String>>>,
    },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String, code: &'static str },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a simple validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: codes::validation::INVALID_INPUT,
            field_errors: None,
        }
    }

    /// Create a validation error attributed to one request field
    pub fn field_validation(
        field: impl Into<String>,
        message: impl Into<String>,
        code: &'static str,
    ) -> Self {
        let message = message.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), vec![message.clone()]);
        Self::Validation {
            message,
            code,
            field_errors: Some(field_errors),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, code: &'static str) -> Self {
        Self::NotFound {
            resource: resource.into(),
            code,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::BadRequest { .. } => "bad_request",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { code, .. } | ApiError::NotFound { code, .. } => code,
            ApiError::BadRequest { .. } => codes::validation::INVALID_INPUT,
            ApiError::Internal { .. } => codes::internal::UNEXPECTED,
        }
    }

    fn suggestions(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Validation { .. } => Some(vec![
                "Amounts must be non-negative and finite".to_string(),
                "coinsurance_rate is a fraction between 0 and 1".to_string(),
            ]),
            ApiError::NotFound { .. } => Some(vec![
                "List valid slugs via /api/v1/procedures, /api/v1/providers and /api/v1/plans"
                    .to_string(),
            ]),
            ApiError::BadRequest { .. } => Some(vec![
                "Check the request body and query parameters against /api-docs/openapi.json"
                    .to_string(),
            ]),
            ApiError::Internal { .. } => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status = self.status_code();

        if status.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = self.error_type(),
                code = self.code(),
                error = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                error_id = %error_id,
                error_type = self.error_type(),
                code = self.code(),
                error = %self,
                "Request rejected"
            );
        }

        let message = match &self {
            ApiError::Validation { message, .. }
            | ApiError::BadRequest { message }
            | ApiError::Internal { message } => message.clone(),
            ApiError::NotFound { .. } => self.to_string(),
        };
        let field_errors = match &self {
            ApiError::Validation { field_errors, .. } => field_errors.clone(),
            _ => None,
        };

        let body = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            code: self.code().to_string(),
            message,
            field_errors,
            timestamp: chrono::Utc::now(),
            suggestions: self.suggestions(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<LiabilityError> for ApiError {
    fn from(err: LiabilityError) -> Self {
        ApiError::field_validation(err.field().as_str(), err.to_string(), err.code())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::CostSharing(inner) => inner.into(),
            err if err.is_not_found() => {
                let code = err.code();
                ApiError::not_found(err.to_string(), code)
            }
            CatalogError::Invalid(message) => ApiError::Validation {
                message,
                code: codes::validation::INVALID_INPUT,
                field_errors: None,
            },
            err => ApiError::internal(err.to_string()),
        }
    }
}

/// Wrap data in the success envelope
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
    }
}

pub type ApiResult<T> = Result<axum::Json<ApiResponse<T>>, ApiError>;
