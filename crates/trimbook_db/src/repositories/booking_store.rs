//! Data-access interface for the booking path
//!
//! The availability engine depends on this trait abstractly, so the storage
//! engine can be swapped or mocked in tests. All date and time values cross
//! this boundary as the stored plain strings (`YYYY-MM-DD`, `HH:MM:SS`);
//! turning them into absolute instants is the caller's job, keeping the store
//! free of timezone logic.

use crate::error::DbError;
use serde::{Deserialize, Serialize};
use trimbook_common::services::BoxFuture;

/// A staff member who can be booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barber {
    pub id: i64,
    pub name: String,
    pub salon_id: i64,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    /// External calendar to mirror this barber's bookings into, if any.
    pub calendar_id: Option<String>,
}

/// A bookable service from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: i64,
    pub name: String,
    pub duration_minutes: i64,
    pub price_cents: i64,
    pub currency: String,
}

/// A barber's resolved salon assignment and working hours for one date
/// (barber-level defaults merged with any per-date override row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarberAssignment {
    pub salon_id: i64,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
}

/// One existing non-cancelled appointment for a barber/date, as stored.
/// The occupied interval is `time .. time + duration_minutes * number_of_people`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookedSlot {
    pub time: String,
    pub duration_minutes: i64,
    pub number_of_people: i64,
}

/// A persisted appointment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub barber_id: i64,
    pub salon_id: i64,
    pub service_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub date: String,
    pub time: String,
    pub duration_minutes: i64,
    pub number_of_people: i64,
    pub status: String,
    pub calendar_event_id: Option<String>,
}

/// Input for inserting a new appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub barber_id: i64,
    pub salon_id: i64,
    pub service_id: i64,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub date: String,
    pub time: String,
    pub duration_minutes: i64,
    pub number_of_people: i64,
    pub status: String,
}

/// Storage operations the booking path depends on.
///
/// Object-safe (boxed futures) so handlers can hold an `Arc<dyn BookingStore>`.
pub trait BookingStore: Send + Sync {
    fn find_barber(&self, barber_id: i64) -> BoxFuture<'_, Option<Barber>, DbError>;

    fn find_barber_by_name(&self, name: &str) -> BoxFuture<'_, Option<Barber>, DbError>;

    fn find_service(&self, service_id: i64) -> BoxFuture<'_, Option<ServiceOffering>, DbError>;

    /// Resolve the barber's salon and working hours for one date.
    /// Returns `None` when the barber does not exist.
    fn assignment_for(
        &self,
        barber_id: i64,
        date: &str,
    ) -> BoxFuture<'_, Option<BarberAssignment>, DbError>;

    /// All non-cancelled appointments for the barber on the given date.
    fn booked_slots(&self, barber_id: i64, date: &str)
        -> BoxFuture<'_, Vec<BookedSlot>, DbError>;

    /// Insert a new appointment. Fails with `DbError::UniqueViolation` when a
    /// non-cancelled appointment already occupies the same start time.
    fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, Appointment, DbError>;

    /// Attach the external calendar event id to an appointment after sync.
    fn set_calendar_event(
        &self,
        appointment_id: i64,
        event_id: &str,
    ) -> BoxFuture<'_, (), DbError>;

    /// Mark an appointment cancelled. Returns the updated record, or `None`
    /// when no such appointment exists (already-cancelled rows pass through).
    fn cancel_appointment(
        &self,
        appointment_id: i64,
    ) -> BoxFuture<'_, Option<Appointment>, DbError>;

    /// List appointments in a closed date range, newest date first.
    fn list_appointments(
        &self,
        start_date: &str,
        end_date: &str,
        include_cancelled: bool,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError>;
}
