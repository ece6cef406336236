use axum::{
    Json,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use thiserror::Error;

use super::headers::AlertHeaders;
use super::models::{ErrorResponse, FieldError};
use crate::domain::{CriteriaError, PageError};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Structural request error reported to the client application through alert headers
    #[error("{title}")]
    BadRequestAlert {
        title: String,
        entity_name: &'static str,
        error_key: &'static str,
        headers: HeaderMap,
    },
    #[error("validation failed for {entity_name}")]
    Validation {
        entity_name: &'static str,
        field_errors: Vec<FieldError>,
    },
    #[error("payload invalid: {0}")]
    InvalidPayload(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("payload exceeds the {0} byte limit")]
    PayloadTooLarge(usize),
    #[error("resource not found")]
    NotFound,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request_alert(
        alerts: &AlertHeaders,
        title: impl Into<String>,
        entity_name: &'static str,
        error_key: &'static str,
    ) -> Self {
        let title = title.into();
        let headers = alerts.failure(entity_name, error_key, &title);
        ApiError::BadRequestAlert {
            title,
            entity_name,
            error_key,
            headers,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequestAlert { .. } => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequestAlert { .. } => "BAD_REQUEST_ALERT",
            ApiError::Validation { .. } => "VALIDATION_FAILED",
            ApiError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ApiError::InvalidQuery(_) => "INVALID_QUERY",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();
        let message = self.to_string();

        match self {
            // Missing entities answer with a bare 404
            ApiError::NotFound => status.into_response(),
            ApiError::BadRequestAlert {
                entity_name,
                error_key,
                headers,
                ..
            } => {
                let body = ErrorResponse {
                    code,
                    message,
                    entity_name: Some(entity_name),
                    error_key: Some(error_key),
                    field_errors: Vec::new(),
                };
                (status, headers, Json(body)).into_response()
            }
            ApiError::Validation {
                entity_name,
                field_errors,
            } => {
                let body = ErrorResponse {
                    code,
                    message,
                    entity_name: Some(entity_name),
                    error_key: None,
                    field_errors,
                };
                (status, Json(body)).into_response()
            }
            other => {
                if let ApiError::Internal(reason) = &other {
                    tracing::error!(%reason, "Request failed");
                }
                let body = ErrorResponse {
                    code,
                    message,
                    entity_name: None,
                    error_key: None,
                    field_errors: Vec::new(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::InvalidPayload(value.to_string())
    }
}

impl From<StoreError> for ApiError {
    fn from(value: StoreError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl From<CriteriaError> for ApiError {
    fn from(value: CriteriaError) -> Self {
        ApiError::InvalidQuery(value.to_string())
    }
}

impl From<PageError> for ApiError {
    fn from(value: PageError) -> Self {
        ApiError::InvalidQuery(value.to_string())
    }
}
