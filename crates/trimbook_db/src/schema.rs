//! Schema initialization for the Trimbook database
//!
//! All statements are idempotent (`IF NOT EXISTS`), so `init_schema` can run
//! unconditionally at startup. The partial unique index on
//! `(barber_id, date, time)` is the storage-layer guard against two booking
//! requests racing each other into the same slot: the second insert fails with
//! a unique violation. Cancelled rows are excluded so a freed slot can be
//! re-booked.

use crate::client::DbClient;
use crate::error::DbError;
use tracing::{debug, info};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS salons (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        address TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS services (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        duration_minutes INTEGER NOT NULL,
        price_cents INTEGER NOT NULL,
        currency TEXT NOT NULL DEFAULT 'EUR'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS barbers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        salon_id INTEGER NOT NULL REFERENCES salons(id),
        work_start_hour INTEGER NOT NULL DEFAULT 9,
        work_end_hour INTEGER NOT NULL DEFAULT 18,
        calendar_id TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS schedule_overrides (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        barber_id INTEGER NOT NULL REFERENCES barbers(id),
        date TEXT NOT NULL,
        salon_id INTEGER REFERENCES salons(id),
        work_start_hour INTEGER,
        work_end_hour INTEGER,
        UNIQUE(barber_id, date)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        barber_id INTEGER NOT NULL REFERENCES barbers(id),
        salon_id INTEGER NOT NULL REFERENCES salons(id),
        service_id INTEGER NOT NULL REFERENCES services(id),
        customer_name TEXT NOT NULL,
        customer_phone TEXT NOT NULL,
        customer_email TEXT,
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        duration_minutes INTEGER NOT NULL,
        number_of_people INTEGER NOT NULL DEFAULT 1,
        status TEXT NOT NULL DEFAULT 'confirmed',
        calendar_event_id TEXT,
        created_at TEXT DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_slot
    ON appointments (barber_id, date, time)
    WHERE status <> 'cancelled'
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_appointments_barber_date
    ON appointments (barber_id, date)
    "#,
];

/// Create all tables and indexes if they do not already exist.
pub async fn init_schema(client: &DbClient) -> Result<(), DbError> {
    debug!("Initializing Trimbook schema");
    for statement in SCHEMA {
        client.execute(statement).await?;
    }
    info!("Trimbook schema initialized successfully");
    Ok(())
}
