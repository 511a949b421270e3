// --- File: crates/trimbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g., DATABASE_URL loaded via APP__DATABASE__URL or DATABASE_URL
}

// --- Booking Config ---
// Salon-wide scheduling defaults. Work hours are per-barber in the database;
// these values apply when a barber row carries none.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingConfig {
    /// IANA time zone the salon's local clock runs in, e.g. "Europe/Sofia".
    pub time_zone: Option<String>,
    pub default_work_start_hour: Option<u32>,
    pub default_work_end_hour: Option<u32>,
    /// Minimum lead time before a same-day slot may start, in minutes.
    pub lead_time_minutes: Option<i64>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            time_zone: None,
            default_work_start_hour: Some(9),
            default_work_end_hour: Some(18),
            lead_time_minutes: Some(0),
        }
    }
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    /// Path to the service account key JSON file.
    pub key_path: Option<String>,
    /// Default calendar to sync bookings into when a barber has no calendar of their own.
    pub calendar_id: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub booking: Option<BookingConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
}
