use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

/// User-facing text for every failed AI generation, whatever the cause.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate question. Check the API key or try again.";

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("{GENERATION_FAILED_MESSAGE}")]
    Generation(#[from] GenerationError),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Failure modes of the external question generator. They collapse into a
/// single message for the caller but keep their kind for logs and codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("generation service failed: {0}")]
    Service(String),

    #[error("generation service returned no content")]
    EmptyResponse,

    #[error("generation service returned malformed JSON: {0}")]
    MalformedResponse(String),

    #[error("generated question is invalid: {0}")]
    InvalidQuestion(String),
}

impl GenerationError {
    pub fn is_invalid_payload(&self) -> bool {
        !matches!(self, GenerationError::Service(_))
    }
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::Busy(_) => "BUSY",
            AppError::Generation(e) if e.is_invalid_payload() => "INVALID_GENERATED_QUESTION",
            AppError::Generation(_) => "GENERATION_FAILED",
            AppError::StorageError(_) => "STORAGE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    pub status: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidState(_) => StatusCode::CONFLICT,
            AppError::Busy(_) => StatusCode::CONFLICT,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::StorageError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.error_code(),
            status: self.status_code().as_u16(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::StorageError(format!("JSON error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;
