use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::BookingError;
use crate::models::{Booking, BookingStatus};
use crate::state::AppState;

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct AdminBooking {
    #[serde(flatten)]
    pub booking: Booking,
    pub package_name: String,
}

#[derive(Serialize)]
pub struct BookingsResponse {
    pub success: bool,
    pub bookings: Vec<AdminBooking>,
    pub count: usize,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<BookingsResponse>, BookingError> {
    let limit = query.limit.unwrap_or(50);

    let rows = {
        let db = state.db.lock().unwrap();
        queries::get_all_bookings(&db, query.status.as_deref(), limit)?
    };

    let bookings: Vec<AdminBooking> = rows
        .into_iter()
        .map(|row| AdminBooking {
            booking: row.booking,
            package_name: row.package_name,
        })
        .collect();
    let count = bookings.len();

    Ok(Json(BookingsResponse {
        success: true,
        bookings,
        count,
    }))
}

// POST /api/admin/bookings/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, BookingError> {
    let status = BookingStatus::from_input(&body.status)
        .ok_or_else(|| BookingError::InvalidStatus(body.status.clone()))?;

    let updated = {
        let db = state.db.lock().unwrap();
        queries::update_booking_status(&db, id, &status)?
    };

    match updated {
        Some(booking) => {
            tracing::info!(id, status = status.as_str(), "booking status updated");
            Ok(Json(serde_json::json!({
                "success": true,
                "booking": booking,
            })))
        }
        None => Err(BookingError::NotFound(format!("booking {id}"))),
    }
}
