use std::collections::BTreeMap;

use chrono::Utc;
use rand::Rng;
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::errors::BookingError;
use crate::models::{BookingRequest, BookingStatus, NewBooking};
use crate::services::{availability, pricing, timefmt};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub booking_reference: String,
    pub subtotal: i64,
    pub total_amount: i64,
}

/// Validates, prices, and persists a wizard submission. Totals come
/// exclusively from the catalog in the store; nothing the client sent
/// is trusted for money. Either every step succeeds and exactly one row
/// is written, or nothing is.
pub fn submit_booking(
    conn: &Connection,
    request: &BookingRequest,
) -> Result<BookingConfirmation, BookingError> {
    let customer_name = required_text(request.customer_name.as_deref(), "customerName")?;
    let customer_email = required_text(request.customer_email.as_deref(), "customerEmail")?;
    let event_date = request
        .event_date
        .ok_or(BookingError::MissingField("eventDate"))?;
    let event_time_12 = required_text(request.event_time.as_deref(), "eventTime")?;
    let package_id = request
        .package_id
        .ok_or(BookingError::MissingField("packageId"))?;

    let event_time = timefmt::to_24_hour(event_time_12)?;

    // Fast-path check for a friendlier conflict error; the unique slot
    // index at insert time is what actually decides races.
    if !availability::is_available(conn, event_date, &event_time)? {
        return Err(BookingError::SlotTaken {
            date: event_date,
            time: event_time,
        });
    }

    let packages = queries::get_packages(conn)?;
    let addons = queries::get_addons(conn)?;

    let quote = pricing::price_booking(&packages, &addons, package_id, &request.addon_quantities)?;
    if !quote.violations.is_empty() {
        return Err(BookingError::ConstraintViolation(quote.violations));
    }

    let selected_addons: BTreeMap<i64, i64> = request
        .addon_quantities
        .iter()
        .filter(|&(_, &qty)| qty > 0)
        .map(|(&id, &qty)| (id, qty))
        .collect();

    let booking = NewBooking {
        booking_reference: generate_booking_reference(),
        customer_name: customer_name.to_string(),
        customer_email: customer_email.to_string(),
        customer_phone: non_blank(request.customer_phone.as_deref()),
        event_date,
        event_time: event_time.clone(),
        event_type: non_blank(request.event_type.as_deref()),
        guest_count: request.guest_count,
        venue_address: non_blank(request.venue_address.as_deref()),
        package_id,
        selected_addons,
        subtotal: quote.subtotal,
        total_amount: quote.total_amount,
        status: BookingStatus::Pending,
        special_requests: non_blank(request.special_requests.as_deref()),
    };

    match queries::insert_booking(conn, &booking) {
        Ok(_) => {}
        Err(err) if is_slot_conflict(&err) => {
            tracing::warn!(date = %event_date, time = %event_time, "lost slot race on insert");
            return Err(BookingError::SlotTaken {
                date: event_date,
                time: event_time,
            });
        }
        Err(err) => return Err(BookingError::Storage(err.into())),
    }

    tracing::info!(
        reference = %booking.booking_reference,
        package_id,
        total_amount = quote.total_amount,
        "booking created"
    );

    Ok(BookingConfirmation {
        booking_reference: booking.booking_reference,
        subtotal: quote.subtotal,
        total_amount: quote.total_amount,
    })
}

/// "MB" + last six digits of the millisecond clock + three random
/// base-36 characters. Uniqueness is probabilistic; the UNIQUE column
/// on booking_reference is the backstop.
pub fn generate_booking_reference() -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

    let tail = Utc::now().timestamp_millis() % 1_000_000;
    let mut rng = rand::thread_rng();
    let suffix: String = (0..3)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("MB{tail:06}{suffix}")
}

fn required_text<'a>(
    value: Option<&'a str>,
    field: &'static str,
) -> Result<&'a str, BookingError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(BookingError::MissingField(field)),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn is_slot_conflict(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, Some(msg)) => {
            e.code == rusqlite::ErrorCode::ConstraintViolation
                && msg.contains("bookings.event_date")
        }
        _ => false,
    }
}
