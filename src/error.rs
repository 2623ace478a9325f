use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("user already exists")]
    Conflict,

    // Unknown email and wrong password both end up here.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authentication failed: {0}")]
    Authentication(&'static str),

    #[error("server error: {0}")]
    Server(String),
}

impl AppError {
    pub fn server(e: impl std::fmt::Display) -> Self {
        Self::Server(e.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<crate::auth::repo::StoreError> for AppError {
    fn from(e: crate::auth::repo::StoreError) -> Self {
        match e {
            crate::auth::repo::StoreError::Duplicate => AppError::Conflict,
            other => AppError::server(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation(errors) => json!({ "errors": errors }),
            AppError::Conflict => json!({ "message": "User already exists" }),
            AppError::InvalidCredentials => json!({ "message": "Invalid credentials" }),
            AppError::Authentication(reason) => json!({ "message": reason }),
            AppError::Server(detail) => {
                tracing::error!(error = %detail, "request failed");
                json!({ "message": "Server error" })
            }
        };
        (status, Json(body)).into_response()
    }
}
