use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::BookingError;
use crate::models::{Booking, BookingRequest};
use crate::services::{availability, booking, timefmt};
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<serde_json::Value>, BookingError> {
    let confirmation = {
        let db = state.db.lock().unwrap();
        booking::submit_booking(&db, &request)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Booking created successfully",
        "bookingReference": confirmation.booking_reference,
        "totalAmount": confirmation.total_amount,
    })))
}

// GET /api/bookings/:reference
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(reference): Path<String>,
) -> Result<Json<Booking>, BookingError> {
    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_booking_by_reference(&db, &reference)?
    };

    booking
        .map(Json)
        .ok_or_else(|| BookingError::NotFound(format!("booking {reference}")))
}

// GET /api/availability?date=YYYY-MM-DD&time=H:MM+AM
#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<serde_json::Value>, BookingError> {
    let date = query.date.ok_or(BookingError::MissingField("date"))?;
    let time_12 = query
        .time
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(BookingError::MissingField("time"))?;

    let time = timefmt::to_24_hour(time_12)?;
    let available = {
        let db = state.db.lock().unwrap();
        availability::is_available(&db, date, &time)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "available": available,
    })))
}
