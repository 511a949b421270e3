// --- File: crates/trimbook_booking/src/logic.rs ---
//! The availability engine.
//!
//! Everything here is a pure function of its inputs: given a barber's working
//! hours for a day, the already-booked intervals and a requested service
//! duration, compute the bookable windows on the fixed 30-minute grid, or
//! decide whether one requested window is free. All arithmetic happens on
//! `DateTime<Utc>`; the salon's local clock enters exactly once, through
//! [`day_bounds`] and [`slot_instant`].

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use trimbook_db::{BarberAssignment, BookedSlot, DbError};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Width of the booking grid. Window starts snap to `:00` and `:30` past each
/// hour regardless of the service duration.
pub const SLOT_STEP_MINUTES: i64 = 30;

/// Upper bound on `numberOfPeople` accepted from requests. Party bookings
/// multiply the service duration, so an unchecked size would let a single
/// request claim an absurd block (or overflow the duration arithmetic).
pub const MAX_PARTY_SIZE: i64 = 20;

// --- Error Handling ---
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("Slot already booked")]
    Conflict,
    #[error("Calculation error: {0}")]
    Calculation(String),
    #[error("Database error: {0}")]
    Database(DbError),
}

impl From<DbError> for BookingError {
    fn from(err: DbError) -> Self {
        match err {
            // The unique slot index fired under our feet; same outcome as the
            // in-process conflict gate
            DbError::UniqueViolation => BookingError::Conflict,
            other => BookingError::Database(other),
        }
    }
}

/// Convert BookingError to the shared application error type.
impl From<BookingError> for trimbook_common::TrimbookError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::NotFound(msg) => trimbook_common::not_found(msg),
            BookingError::Validation(msg) => trimbook_common::validation_error(msg),
            BookingError::Conflict => trimbook_common::conflict("Slot already booked"),
            BookingError::Calculation(msg) => trimbook_common::internal_error(msg),
            BookingError::Database(e) => trimbook_common::TrimbookError::DatabaseError(e.to_string()),
        }
    }
}

// --- Data Structures ---

/// One existing confirmed appointment as an absolute half-open interval
/// `[start, end)`. Immutable once read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A bookable window `[start, end)`: exactly as long as the effective service
/// duration, starting on a grid boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailabilityWindow {
    #[cfg_attr(feature = "openapi", schema(example = "2026-09-14T07:00:00Z"))]
    pub start: DateTime<Utc>,
    #[cfg_attr(feature = "openapi", schema(example = "2026-09-14T08:00:00Z"))]
    pub end: DateTime<Utc>,
}

/// Per-barber, per-day facts needed to compute availability. Reconstructed
/// fresh on every request, never cached or persisted.
#[derive(Debug, Clone)]
pub struct ResourceSchedule {
    pub salon_id: i64,
    pub day_start: DateTime<Utc>,
    pub day_end: DateTime<Utc>,
    pub booked: Vec<BookedInterval>,
}

impl ResourceSchedule {
    /// Resolve one barber-day from the stored assignment and appointment rows.
    pub fn resolve(
        date: NaiveDate,
        assignment: &BarberAssignment,
        booked_rows: &[BookedSlot],
        tz: Tz,
    ) -> Result<Self, BookingError> {
        let (day_start, day_end) = day_bounds(
            date,
            assignment.work_start_hour,
            assignment.work_end_hour,
            tz,
        )?;
        Ok(Self {
            salon_id: assignment.salon_id,
            day_start,
            day_end,
            booked: expand_booked_slots(date, booked_rows, tz)?,
        })
    }

    /// The bookable windows for this day.
    pub fn windows(
        &self,
        duration: Duration,
        earliest_allowed_start: Option<DateTime<Utc>>,
    ) -> Vec<AvailabilityWindow> {
        generate_slots(
            self.day_start,
            self.day_end,
            duration,
            &self.booked,
            earliest_allowed_start,
        )
    }

    /// Commit-time gate for one requested window against this day's bookings.
    pub fn is_free(&self, requested_start: DateTime<Utc>, duration: Duration) -> bool {
        is_requested_slot_free(requested_start, duration, &self.booked)
    }
}

// --- Time Boundary Conversion ---

/// Resolve a salon-local wall-clock time to a UTC instant. Ambiguous local
/// times (DST fall-back) take the earlier offset; nonexistent ones
/// (spring-forward gap) advance to the next valid hour.
fn resolve_local(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, BookingError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                BookingError::Calculation(format!("unresolvable local time {naive} in {tz}"))
            }),
    }
}

/// Compute the UTC work-day boundaries for a date from the barber's local
/// work hours. An hour of 24 means midnight of the following day.
pub fn day_bounds(
    date: NaiveDate,
    work_start_hour: u32,
    work_end_hour: u32,
    tz: Tz,
) -> Result<(DateTime<Utc>, DateTime<Utc>), BookingError> {
    let hour_instant = |hour: u32| -> Result<DateTime<Utc>, BookingError> {
        let (date, hour) = if hour >= 24 {
            (date + Duration::days(1), hour - 24)
        } else {
            (date, hour)
        };
        let naive = date.and_hms_opt(hour, 0, 0).ok_or_else(|| {
            BookingError::Validation(format!("invalid work hour {hour} for {date}"))
        })?;
        resolve_local(naive, tz)
    };
    Ok((hour_instant(work_start_hour)?, hour_instant(work_end_hour)?))
}

/// Resolve a stored or requested `(date, time)` pair to a UTC instant.
pub fn slot_instant(date: NaiveDate, time: NaiveTime, tz: Tz) -> Result<DateTime<Utc>, BookingError> {
    resolve_local(date.and_time(time), tz)
}

/// Expand stored appointment rows for one date into absolute booked intervals.
/// Each row occupies `duration × party size` from its start time.
pub fn expand_booked_slots(
    date: NaiveDate,
    slots: &[BookedSlot],
    tz: Tz,
) -> Result<Vec<BookedInterval>, BookingError> {
    slots
        .iter()
        .map(|slot| {
            let time = parse_slot_time(&slot.time).ok_or_else(|| {
                BookingError::Calculation(format!("malformed stored time {:?}", slot.time))
            })?;
            let start = slot_instant(date, time, tz)?;
            let end = start
                .checked_add_signed(effective_duration(
                    slot.duration_minutes,
                    slot.number_of_people,
                ))
                .ok_or_else(|| {
                    BookingError::Calculation(format!(
                        "stored duration out of range at {:?}",
                        slot.time
                    ))
                })?;
            Ok(BookedInterval { start, end })
        })
        .collect()
}

/// Parse a stored `HH:MM:SS` time; bare `HH:MM` is tolerated.
pub fn parse_slot_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

// --- Availability Logic ---

/// Strict half-open interval intersection.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// Round an instant up to the next grid boundary at or after `t`. The grid is
/// anchored at `anchor`, which callers take from the local work-day start, so
/// boundaries land on the salon's local `:00`/`:30` even in zones whose UTC
/// offset is not a multiple of the step (Kathmandu is +05:45).
/// Already-aligned instants are returned unchanged; the origin advances
/// forward, never backward.
pub fn align_to_grid(t: DateTime<Utc>, anchor: DateTime<Utc>) -> DateTime<Utc> {
    let step_secs = SLOT_STEP_MINUTES * 60;
    let delta = t - anchor;
    let rem = delta.num_seconds().rem_euclid(step_secs);
    if rem == 0 && delta.subsec_nanos() == 0 {
        t
    } else {
        anchor + Duration::seconds(delta.num_seconds() - rem + step_secs)
    }
}

/// The effective single-block duration for a booking: a party booking occupies
/// the barber for `duration x party size` rather than parallel slots.
/// Saturates on out-of-range products; handlers bound `party_size` by
/// [`MAX_PARTY_SIZE`] before any value reaches storage.
pub fn effective_duration(service_minutes: i64, party_size: i64) -> Duration {
    let minutes = service_minutes.saturating_mul(party_size.max(1));
    Duration::try_minutes(minutes).unwrap_or(Duration::MAX)
}

/// Generate the ordered sequence of bookable windows for one day.
///
/// Walks the 30-minute grid anchored at `day_start` from the (clamped,
/// grid-aligned) origin,
/// emitting each `[cursor, cursor + duration)` candidate that fits before
/// `day_end` and overlaps no booked interval. Candidates are independent:
/// a rejected one does not shift its neighbours, so slots pack tightly once a
/// booking ends. An inverted range or an oversized duration yields an empty
/// sequence rather than an error.
pub fn generate_slots(
    day_start: DateTime<Utc>,
    day_end: DateTime<Utc>,
    duration: Duration,
    booked: &[BookedInterval],
    earliest_allowed_start: Option<DateTime<Utc>>,
) -> Vec<AvailabilityWindow> {
    if duration <= Duration::zero() {
        return Vec::new();
    }

    let origin = match earliest_allowed_start {
        Some(earliest) if earliest > day_start => earliest,
        _ => day_start,
    };
    let mut cursor = align_to_grid(origin, day_start);
    let step = Duration::minutes(SLOT_STEP_MINUTES);

    debug!(
        "Generating slots in [{}, {}) from {} with {} booked intervals",
        day_start,
        day_end,
        cursor,
        booked.len()
    );

    let mut windows = Vec::new();
    while cursor + duration <= day_end {
        let candidate_end = cursor + duration;
        let blocked = booked
            .iter()
            .any(|b| overlaps(cursor, candidate_end, b.start, b.end));
        if !blocked {
            windows.push(AvailabilityWindow {
                start: cursor,
                end: candidate_end,
            });
        }
        cursor += step;
    }
    windows
}

/// The authoritative commit-time gate: is `[requested_start, requested_start +
/// duration)` free of every booked interval? Stricter than the listing pass,
/// which is advisory and may be stale by the time a booking is committed.
pub fn is_requested_slot_free(
    requested_start: DateTime<Utc>,
    duration: Duration,
    booked: &[BookedInterval],
) -> bool {
    let requested_end = requested_start + duration;
    !booked
        .iter()
        .any(|b| overlaps(requested_start, requested_end, b.start, b.end))
}

// --- Wire Types ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    /// Salon the customer is booking at; empty result if the barber is
    /// elsewhere that day.
    #[serde(rename = "saloonId")]
    pub saloon_id: i64,

    #[serde(rename = "serviceId")]
    pub service_id: i64,

    /// Date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2026-09-14"))]
    pub date: String,

    /// Party size; the effective duration is multiplied by it.
    #[serde(rename = "numberOfPeople")]
    pub number_of_people: Option<i64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookAppointmentRequest {
    pub barber_name: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    /// Date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2026-09-14"))]
    pub date: String,
    /// Slot start in HH:MM:SS format
    #[cfg_attr(feature = "openapi", schema(example = "10:00:00"))]
    pub time: String,
    pub service_id: i64,
    pub number_of_people: Option<i64>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookAppointmentResponse {
    pub message: String,
    pub booking_id: i64,
    /// External calendar event id, when sync succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_event: Option<String>,
    /// Present when calendar sync failed; the booking itself is authoritative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_warning: Option<String>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, utoipa::ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AppointmentsQuery {
    /// Start date in YYYY-MM-DD format
    pub start_date: String,
    /// End date in YYYY-MM-DD format
    pub end_date: String,
    /// Whether to include cancelled appointments
    pub include_cancelled: Option<bool>,
}

#[derive(Serialize, Debug)]
pub struct AppointmentsResponse {
    pub appointments: Vec<trimbook_db::Appointment>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CancellationResponse {
    pub success: bool,
    pub message: String,
    /// Present when propagating the cancellation to the calendar failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_warning: Option<String>,
}
