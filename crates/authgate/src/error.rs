// crates/authgate/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::store::StoreError;

/// Domain errors with error codes and HTTP mapping.
///
/// Every operation of the session manager is terminal on the first error;
/// retries, if any, are the caller's business.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("User already exists")]
    Conflict,

    #[error("User not found")]
    NotFound,

    #[error("Invalid credential")]
    InvalidCredential,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Store failure: {0}")]
    Store(#[source] anyhow::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
            AuthError::Conflict => StatusCode::CONFLICT,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredential | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Store(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingField(_) => "VAL_001",
            AuthError::Conflict => "USER_001",
            AuthError::NotFound => "USER_002",
            AuthError::InvalidCredential => "AUTH_001",
            AuthError::InvalidToken => "AUTH_002",
            AuthError::Store(_) => "STORE_001",
            AuthError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            // Client-side errors keep their message; the field name is the
            // caller's own data.
            AuthError::MissingField(field) => format!("Missing field: {field}"),
            AuthError::Conflict => "User already exists".to_string(),
            AuthError::NotFound => "User not found".to_string(),
            AuthError::InvalidCredential => "Invalid credential".to_string(),
            AuthError::InvalidToken => "Invalid token".to_string(),
            AuthError::Store(_) | AuthError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Store(err.0)
    }
}
