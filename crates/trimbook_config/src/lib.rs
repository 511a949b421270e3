// --- File: crates/trimbook_config/src/lib.rs ---
//! Unified configuration loading for Trimbook.
//!
//! Layered loading: `config/default.toml`, then an optional
//! `config/{RUN_MODE}.toml`, then `APP`-prefixed environment variables
//! (`APP__SERVER__PORT=8086` overrides `server.port`). A `.env` file is
//! honoured for local development.

pub mod models;

use config::{Config, ConfigError, Environment, File};
use std::sync::Once;

pub use models::{AppConfig, BookingConfig, DatabaseConfig, GcalConfig, ServerConfig};

static DOTENV_ONCE: Once = Once::new();

/// Load `.env` into the process environment exactly once.
pub fn ensure_dotenv_loaded() {
    DOTENV_ONCE.call_once(|| {
        // Missing .env is fine; real deployments set env vars directly
        let _ = dotenv::dotenv();
    });
}

/// Loads the application configuration.
///
/// # Errors
///
/// Returns a `ConfigError` if no configuration source yields a valid
/// `AppConfig` (the server section is mandatory).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8086)?
        .build()?;

    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_valid_config() {
        let config = load_config().expect("default config should load");
        assert!(!config.server.host.is_empty());
        assert!(config.server.port > 0);
    }

    #[test]
    fn booking_config_defaults() {
        let booking = BookingConfig::default();
        assert_eq!(booking.default_work_start_hour, Some(9));
        assert_eq!(booking.default_work_end_hour, Some(18));
    }

    #[test]
    fn app_config_deserializes_from_json() {
        let raw = r#"{
            "server": {"host": "0.0.0.0", "port": 9000},
            "use_gcal": true,
            "database": {"url": "sqlite::memory:"},
            "booking": {"time_zone": "Europe/Sofia"},
            "gcal": {"key_path": "keys/sa.json", "calendar_id": "primary"}
        }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert!(config.use_gcal);
        assert_eq!(
            config.booking.unwrap().time_zone.as_deref(),
            Some("Europe/Sofia")
        );
    }
}
