// src/error.rs
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("DATABASE_URL not configured")]
    Configuration,

    #[error("{0}")]
    NotFound(String),

    #[error("Not found")]
    RouteNotFound,

    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidBody(String),
}

impl AppError {
    pub fn template_not_found() -> Self {
        AppError::NotFound("Template not found".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Configuration
            | AppError::Database(_)
            | AppError::Json(_)
            | AppError::InvalidBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Body written for every error status.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type AppResult<T> = Result<T, AppError>;
