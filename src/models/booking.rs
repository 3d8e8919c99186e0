use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub booking_reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_type: Option<String>,
    pub guest_count: Option<i64>,
    pub venue_address: Option<String>,
    pub package_id: i64,
    pub selected_addons: BTreeMap<i64, i64>,
    pub subtotal: i64,
    pub total_amount: i64,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Row about to be inserted; the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booking_reference: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub event_type: Option<String>,
    pub guest_count: Option<i64>,
    pub venue_address: Option<String>,
    pub package_id: i64,
    pub selected_addons: BTreeMap<i64, i64>,
    pub subtotal: i64,
    pub total_amount: i64,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" => BookingStatus::Cancelled,
            "completed" => BookingStatus::Completed,
            _ => BookingStatus::Pending,
        }
    }

    /// Strict variant for client-supplied status values.
    pub fn from_input(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }
}

/// Wizard submission as it arrives over the wire. Required fields are
/// optional here so their absence maps to a MissingField error instead
/// of a deserialization failure. Carries no price fields at all: totals
/// are computed server-side from the catalog.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub event_time: Option<String>,
    pub event_type: Option<String>,
    pub guest_count: Option<i64>,
    pub venue_address: Option<String>,
    pub package_id: Option<i64>,
    #[serde(default)]
    pub addon_quantities: BTreeMap<i64, i64>,
    pub special_requests: Option<String>,
}
