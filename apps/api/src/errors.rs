use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::AnecdoteError;
use crate::resume::parser::ResumeParseError;
use crate::scoring::AtsScoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ResumeParseError> for AppError {
    fn from(err: ResumeParseError) -> Self {
        match err {
            ResumeParseError::NotFound(path) => {
                AppError::NotFound(format!("PDF file not found: {}", path.display()))
            }
            ResumeParseError::Frontmatter(e) => AppError::Internal(e.into()),
            other => AppError::UnprocessableEntity(other.to_string()),
        }
    }
}

impl From<AtsScoreError> for AppError {
    fn from(err: AtsScoreError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<AnecdoteError> for AppError {
    fn from(err: AnecdoteError) -> Self {
        match err {
            AnecdoteError::Frontmatter { .. } => AppError::UnprocessableEntity(err.to_string()),
            AnecdoteError::Io { .. } => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (
                AppError::UnprocessableEntity("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::Storage("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_resume_parse_error_mapping() {
        let err: AppError = ResumeParseError::NoText.into();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));

        let err: AppError = ResumeParseError::NotFound("a.pdf".into()).into();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_ats_score_error_is_validation() {
        let err: AppError = AtsScoreError::EmptyResume.into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_anecdote_error_mapping() {
        let yaml_err = serde_yaml::from_str::<Vec<String>>("[unclosed").unwrap_err();
        let err: AppError = AnecdoteError::Frontmatter {
            path: "a.md".into(),
            source: yaml_err,
        }
        .into();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }
}
