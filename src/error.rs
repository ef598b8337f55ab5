use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures raised synchronously by the job queues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Invalid argument: a work item is required")]
    InvalidArgument,

    #[error("No queue registered for {0}")]
    NotRegistered(String),
}

/// Failures while reading or writing CSV data exchange files.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Invalid record format at line {line}: {record}")]
    RecordFormat { line: usize, record: String },

    #[error("Invalid value for {field} at line {line}: {value}")]
    FieldValue {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Unknown {kind} referenced: {reference}")]
    UnknownReference { kind: &'static str, reference: String },

    #[error("Duplicate {kind}: {description}")]
    Duplicate {
        kind: &'static str,
        description: String,
    },

    #[error("Value cannot be exported because it contains a double quote: {0}")]
    QuotedValue(String),

    #[error("Export file name must be a relative path inside the export directory: {0}")]
    FileName(String),

    #[error("Invalid record pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred")
            }
            Self::Queue(QueueError::InvalidArgument) => {
                (StatusCode::BAD_REQUEST, "A work item is required")
            }
            Self::Queue(ref e) => {
                tracing::error!("Queue error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Job queue unavailable")
            }
            Self::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            Self::Other(ref e) => {
                tracing::error!("Unexpected error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "An unexpected error occurred")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
