//! Database integration for Trimbook
//!
//! This crate provides a database client built on SQLx's `Any` driver
//! (SQLite by default, PostgreSQL behind a feature flag), the appointment
//! schema, and the `BookingStore` repository interface the booking path
//! depends on.
//!
//! # Example
//!
//! ```rust,no_run
//! use trimbook_db::{DbClient, SqlBookingStore};
//!
//! async fn setup() -> Result<SqlBookingStore, Box<dyn std::error::Error>> {
//!     let client = DbClient::from_url("sqlite://trimbook.db").await?;
//!     trimbook_db::schema::init_schema(&client).await?;
//!     Ok(SqlBookingStore::new(client))
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod schema;

pub use client::DbClient;
pub use error::DbError;
pub use repositories::{
    Appointment, Barber, BarberAssignment, BookedSlot, BookingStore, NewAppointment,
    ServiceOffering, SqlBookingStore,
};
