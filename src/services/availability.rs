use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;

/// A slot is free when no non-cancelled booking occupies the exact
/// (date, time) pair. Point-in-time check only; the unique index on the
/// bookings table is what actually guarantees the invariant.
pub fn is_available(conn: &Connection, date: NaiveDate, time: &str) -> anyhow::Result<bool> {
    let conflicting = queries::count_conflicting(conn, date, time)?;
    Ok(conflicting == 0)
}
