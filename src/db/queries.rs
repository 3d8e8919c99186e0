use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{AddOn, Booking, BookingStatus, NewBooking, Package};

// ── Catalog ──

pub fn get_packages(conn: &Connection) -> anyhow::Result<Vec<Package>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, price, duration_hours, features
         FROM packages ORDER BY price ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        let features_json: String = row.get(5)?;
        Ok(Package {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            price: row.get(3)?,
            duration_hours: row.get(4)?,
            features: serde_json::from_str(&features_json).unwrap_or_default(),
        })
    })?;

    let mut packages = vec![];
    for row in rows {
        packages.push(row?);
    }
    Ok(packages)
}

pub fn get_addons(conn: &Connection) -> anyhow::Result<Vec<AddOn>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, category, price, is_hourly, available_packages
         FROM addons ORDER BY category, name",
    )?;

    let rows = stmt.query_map([], |row| {
        let available_json: String = row.get(6)?;
        Ok(AddOn {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            category: row.get(3)?,
            price: row.get(4)?,
            is_hourly: row.get::<_, i64>(5)? != 0,
            available_packages: serde_json::from_str(&available_json).unwrap_or_default(),
        })
    })?;

    let mut addons = vec![];
    for row in rows {
        addons.push(row?);
    }
    Ok(addons)
}

// ── Bookings ──

/// Returns the raw rusqlite error so the caller can distinguish a slot
/// uniqueness failure from other storage problems.
pub fn insert_booking(conn: &Connection, booking: &NewBooking) -> Result<i64, rusqlite::Error> {
    let event_date = booking.event_date.format("%Y-%m-%d").to_string();
    let selected_addons =
        serde_json::to_string(&booking.selected_addons).unwrap_or_else(|_| "{}".to_string());

    conn.execute(
        "INSERT INTO bookings (
            booking_reference, customer_name, customer_email, customer_phone,
            event_date, event_time, event_type, guest_count, venue_address,
            package_id, selected_addons, subtotal, total_amount, status, special_requests
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            booking.booking_reference,
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            event_date,
            booking.event_time,
            booking.event_type,
            booking.guest_count,
            booking.venue_address,
            booking.package_id,
            selected_addons,
            booking.subtotal,
            booking.total_amount,
            booking.status.as_str(),
            booking.special_requests,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn count_conflicting(conn: &Connection, date: NaiveDate, time: &str) -> anyhow::Result<i64> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE event_date = ?1 AND event_time = ?2 AND status != 'cancelled'",
        params![date_str, time],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_booking_by_reference(
    conn: &Connection,
    reference: &str,
) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_reference = ?1"),
        params![reference],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub struct BookingWithPackage {
    pub booking: Booking,
    pub package_name: String,
}

pub fn get_all_bookings(
    conn: &Connection,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<BookingWithPackage>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {BOOKING_COLUMNS_QUALIFIED}, p.name FROM bookings b
                 JOIN packages p ON b.package_id = p.id
                 WHERE b.status = ?1
                 ORDER BY b.event_date DESC, b.event_time DESC LIMIT ?2"
            ),
            vec![
                Box::new(status.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
        None => (
            format!(
                "SELECT {BOOKING_COLUMNS_QUALIFIED}, p.name FROM bookings b
                 JOIN packages p ON b.package_id = p.id
                 ORDER BY b.event_date DESC, b.event_time DESC LIMIT ?1"
            ),
            vec![Box::new(limit) as Box<dyn rusqlite::types::ToSql>],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| {
        let package_name: String = row.get(18)?;
        Ok((parse_booking_row(row), package_name))
    })?;

    let mut bookings = vec![];
    for row in rows {
        let (booking, package_name) = row?;
        bookings.push(BookingWithPackage {
            booking: booking?,
            package_name,
        });
    }
    Ok(bookings)
}

pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: &BookingStatus,
) -> anyhow::Result<Option<Booking>> {
    let now = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now, id],
    )?;
    if count == 0 {
        return Ok(None);
    }
    get_booking_by_id(conn, id)
}

const BOOKING_COLUMNS: &str = "id, booking_reference, customer_name, customer_email, \
     customer_phone, event_date, event_time, event_type, guest_count, venue_address, \
     package_id, selected_addons, subtotal, total_amount, status, special_requests, \
     created_at, updated_at";

const BOOKING_COLUMNS_QUALIFIED: &str = "b.id, b.booking_reference, b.customer_name, \
     b.customer_email, b.customer_phone, b.event_date, b.event_time, b.event_type, \
     b.guest_count, b.venue_address, b.package_id, b.selected_addons, b.subtotal, \
     b.total_amount, b.status, b.special_requests, b.created_at, b.updated_at";

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let event_date_str: String = row.get(5)?;
    let selected_addons_json: String = row.get(11)?;
    let status_str: String = row.get(14)?;
    let created_at_str: String = row.get(16)?;
    let updated_at_str: String = row.get(17)?;

    let event_date = NaiveDate::parse_from_str(&event_date_str, "%Y-%m-%d")?;
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Booking {
        id: row.get(0)?,
        booking_reference: row.get(1)?,
        customer_name: row.get(2)?,
        customer_email: row.get(3)?,
        customer_phone: row.get(4)?,
        event_date,
        event_time: row.get(6)?,
        event_type: row.get(7)?,
        guest_count: row.get(8)?,
        venue_address: row.get(9)?,
        package_id: row.get(10)?,
        selected_addons: serde_json::from_str(&selected_addons_json).unwrap_or_default(),
        subtotal: row.get(12)?,
        total_amount: row.get(13)?,
        status: BookingStatus::parse(&status_str),
        special_requests: row.get(15)?,
        created_at,
        updated_at,
    })
}
