use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use database_layer::DatabaseError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, error};
use uuid::Uuid;
use validator::ValidationErrors;

use crate::validation::field_errors;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error type/code
    pub error_type: String,
    /// Human-readable error message
    pub message: String,
    /// Field-specific validation errors, keyed by JSON field name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Suggested actions for resolving the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, Vec<String>>>,
    },

    #[error("Resource not found: {resource_type}")]
    NotFound { resource_type: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Create a validation error with field-specific errors
    pub fn validation_with_fields(
        message: impl Into<String>,
        field_errors: HashMap<String, Vec<String>>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    /// Create a simple validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Database(db_err) => match db_err {
                DatabaseError::NotFound { .. } => StatusCode::NOT_FOUND,
                DatabaseError::ConnectionFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Database(DatabaseError::NotFound { .. }) => "not_found",
            ApiError::Database(_) => "database_error",
            ApiError::Internal { .. } => "internal_error",
        }
    }

    /// Get suggested actions for resolving the error
    pub fn suggestions(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Validation { .. } => Some(vec![
                "Check the request payload for invalid fields".to_string(),
                "Dates use the YYYY-MM-DD format and phone numbers 000-000-0000".to_string(),
            ]),
            ApiError::NotFound { .. } => Some(vec![
                "Verify the patient ID is correct".to_string(),
            ]),
            ApiError::Database(DatabaseError::ConnectionFailed(_)) => Some(vec![
                "Try again in a few moments".to_string(),
                "Contact support if the issue persists".to_string(),
            ]),
            _ => None,
        }
    }

    /// Message safe to show a client; driver details stay in the log.
    pub fn format_database_error(db_error: &DatabaseError) -> String {
        match db_error {
            DatabaseError::ConnectionFailed(_) => {
                "Unable to connect to the database.".to_string()
            }
            DatabaseError::NotFound { entity, id } => {
                format!("No {} with id {}", entity, id)
            }
            DatabaseError::QueryFailed(msg) => {
                if msg.contains("not null") {
                    "Required field is missing or empty.".to_string()
                } else {
                    "Database operation failed. Please try again.".to_string()
                }
            }
            DatabaseError::SqlxError(_) => {
                "Database operation failed. Please try again.".to_string()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Rejected input and unknown ids are ordinary outcomes, not faults.
        if status_code.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "API error occurred"
            );
        } else {
            debug!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "Request rejected"
            );
        }

        let field_errors = match &self {
            ApiError::Validation { field_errors, .. } => field_errors.clone(),
            _ => None,
        };

        let message = match &self {
            ApiError::Database(db_err) => ApiError::format_database_error(db_err),
            _ => self.to_string(),
        };

        let error_response = ApiErrorResponse {
            error_id,
            error_type: self.error_type().to_string(),
            message,
            field_errors,
            timestamp: chrono::Utc::now(),
            suggestions: self.suggestions(),
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::validation_with_fields("Record failed validation", field_errors(&errors))
    }
}

/// Convert anyhow errors to API errors
impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal {
            message: error.to_string(),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::validation("bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("patient").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(DatabaseError::NotFound { entity: "patient", id: 7 }).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DatabaseError::ConnectionFailed("refused".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::from(DatabaseError::QueryFailed("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_details_are_not_exposed() {
        let message = ApiError::format_database_error(&DatabaseError::ConnectionFailed(
            "password authentication failed for user registry".into(),
        ));
        assert!(!message.contains("password"));
    }

    #[tokio::test]
    async fn test_validation_body_carries_field_errors() {
        let mut fields = HashMap::new();
        fields.insert("phone".to_string(), vec!["bad phone".to_string()]);

        let response = ApiError::validation_with_fields("Record failed validation", fields)
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ApiErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error_type, "validation_error");
        assert_eq!(
            body.field_errors.unwrap().get("phone"),
            Some(&vec!["bad phone".to_string()])
        );
        assert!(Uuid::parse_str(&body.error_id).is_ok());
    }
}
