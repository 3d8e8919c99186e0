use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;

use crate::services::pricing::Violation;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid time format: {0:?}")]
    InvalidTimeFormat(String),

    #[error("invalid package selected: {0}")]
    InvalidPackage(i64),

    #[error("invalid booking status: {0:?}")]
    InvalidStatus(String),

    #[error("selected date and time is not available")]
    SlotTaken { date: NaiveDate, time: String },

    #[error("requested add-on quantities exceed the event duration")]
    ConstraintViolation(Vec<Violation>),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::MissingField(_)
            | BookingError::InvalidTimeFormat(_)
            | BookingError::InvalidPackage(_)
            | BookingError::InvalidStatus(_)
            | BookingError::ConstraintViolation(_) => StatusCode::BAD_REQUEST,
            BookingError::SlotTaken { .. } => StatusCode::CONFLICT,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            // Storage details stay in the log, not the response.
            BookingError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                serde_json::json!({ "success": false, "message": "internal server error" })
            }
            BookingError::SlotTaken { date, time } => {
                tracing::debug!(%date, %time, "slot conflict");
                serde_json::json!({ "success": false, "message": self.to_string() })
            }
            BookingError::ConstraintViolation(violations) => serde_json::json!({
                "success": false,
                "message": self.to_string(),
                "violations": violations,
            }),
            _ => serde_json::json!({ "success": false, "message": self.to_string() }),
        };

        (status, axum::Json(body)).into_response()
    }
}
