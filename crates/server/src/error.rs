use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tally_core::{ExpenseError, InvalidMonth};
use tally_ocr::{ExtractionError, OcrError};

/// Every failure a handler can return. Rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    UnsupportedMediaType(String),
    PayloadTooLarge(String),
    Validation(ExpenseError),
    Extraction(ExtractionError),
    Database(sqlx::Error),
    Io(std::io::Error),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::UnsupportedMediaType(m) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, m.clone()),
            ApiError::PayloadTooLarge(m) => (StatusCode::PAYLOAD_TOO_LARGE, m.clone()),
            ApiError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::Extraction(e) => (StatusCode::UNPROCESSABLE_ENTITY, extraction_message(e)),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string()),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string()),
        }
    }
}

fn extraction_message(e: &ExtractionError) -> String {
    match e {
        ExtractionError::Ocr(OcrError::NotAvailable) | ExtractionError::WorkerStopped => {
            "Receipt scanning is not available right now. Please enter the expense manually.".to_string()
        }
        ExtractionError::Preprocess(_) => {
            "The uploaded file could not be read as an image. Please upload another receipt.".to_string()
        }
        _ => "Could not read text from the receipt. Please try another image.".to_string(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        match &self {
            ApiError::Database(e) => tracing::error!(error = %e, "database error"),
            ApiError::Io(e) => tracing::error!(error = %e, "io error"),
            ApiError::Extraction(e) => tracing::warn!(error = %e, "receipt extraction failed"),
            _ => {}
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

impl From<ExpenseError> for ApiError {
    fn from(e: ExpenseError) -> Self {
        ApiError::Validation(e)
    }
}

impl From<ExtractionError> for ApiError {
    fn from(e: ExtractionError) -> Self {
        ApiError::Extraction(e)
    }
}

impl From<InvalidMonth> for ApiError {
    fn from(e: InvalidMonth) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn validation_errors_are_unprocessable() {
        let (status, msg) = ApiError::from(ExpenseError::MissingCategory).status_and_message();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(msg, "Category is required");
    }

    #[test]
    fn extraction_failure_gets_a_user_facing_message() {
        let err = ExtractionError::Io {
            path: PathBuf::from("/nope.png"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let (status, msg) = ApiError::from(err).status_and_message();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(msg.contains("try another image"));
        // internal paths stay out of the response
        assert!(!msg.contains("/nope.png"));
    }

    #[test]
    fn database_details_are_not_leaked() {
        let (status, msg) = ApiError::from(sqlx::Error::RowNotFound).status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(msg, "Database error");
    }
}
