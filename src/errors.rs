use axum::http::StatusCode;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("a record for {0} already exists")]
    DuplicateDate(NaiveDate),
    #[error("{field} must not be negative")]
    NegativeValue { field: &'static str },
    #[error("unsupported image type: {0}")]
    UnsupportedImage(String),
    #[error("image is empty")]
    EmptyImage,
    #[error("failed to persist diary data: {0}")]
    Persist(#[from] std::io::Error),
    #[error("failed to serialize diary data: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }

    fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<DiaryError> for AppError {
    fn from(err: DiaryError) -> Self {
        match err {
            DiaryError::DuplicateDate(_) => Self::with_status(StatusCode::CONFLICT, err.to_string()),
            DiaryError::NegativeValue { .. } | DiaryError::EmptyImage => {
                Self::bad_request(err.to_string())
            }
            DiaryError::UnsupportedImage(_) => {
                Self::with_status(StatusCode::UNSUPPORTED_MEDIA_TYPE, err.to_string())
            }
            DiaryError::Persist(_) | DiaryError::Serialize(_) => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
