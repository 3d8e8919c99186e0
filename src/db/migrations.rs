use anyhow::Context;
use rusqlite::Connection;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS packages (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    price INTEGER NOT NULL,
    duration_hours INTEGER NOT NULL,
    features TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS addons (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    category TEXT NOT NULL DEFAULT '',
    price INTEGER NOT NULL,
    is_hourly INTEGER NOT NULL DEFAULT 0,
    available_packages TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS bookings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    booking_reference TEXT NOT NULL UNIQUE,
    customer_name TEXT NOT NULL,
    customer_email TEXT NOT NULL,
    customer_phone TEXT,
    event_date TEXT NOT NULL,
    event_time TEXT NOT NULL,
    event_type TEXT,
    guest_count INTEGER,
    venue_address TEXT,
    package_id INTEGER NOT NULL REFERENCES packages (id),
    selected_addons TEXT NOT NULL DEFAULT '{}',
    subtotal INTEGER NOT NULL,
    total_amount INTEGER NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    special_requests TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- At most one non-cancelled booking per (date, time) slot. A UNIQUE
-- failure on insert is the authoritative double-booking signal; the
-- pre-insert availability check is only a fast path.
CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_slot
    ON bookings (event_date, event_time)
    WHERE status != 'cancelled';
";

// Prices are in cents.
const SEED_PACKAGES: &str = "
INSERT OR IGNORE INTO packages (id, name, price, duration_hours, description, features) VALUES
(1, 'Mint Pro', 29900, 2, 'Our entry-level package for small events or budgets.',
 '[\"2 Hours of Booth Rental\",\"Unlimited Digital Captures\",\"Fun Filters & Digital Stickers\",\"Standard Template Overlay\",\"LED Ring Light\",\"Standard Backdrop\"]'),
(2, 'Mint Max', 39900, 3, 'A longer session with extra flair for most events.',
 '[\"3 Hours of Booth Rental\",\"All Pro features, plus:\",\"Animated GIF Capture\",\"Glam B&W Filter & AR Masks\",\"Custom Event Overlay\",\"Color-Tunable LED Lighting\"]'),
(3, 'Mint Ultra', 59900, 4, 'The ultimate, all-inclusive photobooth experience.',
 '[\"4 Hours of Booth Rental\",\"All Max features, plus:\",\"HD Video Messages\",\"AI Green Screen Backgrounds\",\"Unlimited On-Site Prints\",\"Premium Backdrop Included\",\"Live Slideshow Feed\"]');
";

const SEED_ADDONS: &str = "
INSERT OR IGNORE INTO addons (id, name, price, description, category, is_hourly, available_packages) VALUES
(1, 'Booth Attendant', 4900, 'Professional attendant per hour', 'service', 1, '[1,2,3]'),
(2, 'Guest Scrapbook Service', 11900, 'Physical scrapbook creation', 'service', 0, '[1,2,3]'),
(3, 'Live Slideshow Station', 11900, 'Real-time photo display', 'equipment', 0, '[1,2]'),
(4, 'Unlimited Prints', 14900, 'On-site photo printing', 'service', 0, '[1,2,3]'),
(5, 'Green-Screen / AI Scene Pack', 7900, 'Digital background effects', 'digital', 0, '[1,2]'),
(6, 'Idle / Early Setup', 4900, 'Setup time per hour', 'service', 1, '[1,2,3]'),
(7, 'Premium Backdrop', 9900, 'Upgraded backdrop option', 'equipment', 0, '[1,2]'),
(8, 'Virtual Booth', 4900, 'Remote photo booth access', 'digital', 0, '[1,2,3]'),
(9, 'Additional Hour', 9900, 'Extend booth rental per hour', 'service', 1, '[1,2,3]');
";

pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(SCHEMA)
        .context("failed to create schema")?;
    seed_catalog(conn)?;
    Ok(())
}

fn seed_catalog(conn: &Connection) -> anyhow::Result<()> {
    let existing: i64 = conn
        .query_row("SELECT COUNT(*) FROM packages", [], |row| row.get(0))
        .context("failed to check for seeded catalog")?;
    if existing > 0 {
        return Ok(());
    }

    conn.execute_batch(SEED_PACKAGES)
        .context("failed to seed packages")?;
    conn.execute_batch(SEED_ADDONS)
        .context("failed to seed add-ons")?;

    tracing::info!("seeded catalog with default packages and add-ons");
    Ok(())
}
