// File: crates/trimbook_booking/src/handlers.rs
use crate::locks::ResourceLocks;
use crate::logic::{
    day_bounds, effective_duration, parse_slot_time, slot_instant, AppointmentsQuery,
    AppointmentsResponse, AvailabilityQuery, AvailabilityWindow, BookAppointmentRequest,
    BookAppointmentResponse, BookingError, CancellationResponse, ResourceSchedule,
    MAX_PARTY_SIZE,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};
use trimbook_common::services::{BoxedError, CalendarEvent, CalendarService};
use trimbook_config::AppConfig;
use trimbook_db::{BookingStore, NewAppointment};

/// Fallback when no time zone is configured. The original deployment runs in
/// Bulgaria.
const DEFAULT_TIME_ZONE: Tz = chrono_tz::Europe::Sofia;

// Define shared state needed by booking handlers
#[derive(Clone)]
pub struct BookingState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn BookingStore>,
    /// Optional best-effort sync target; `None` disables calendar mirroring.
    pub calendar: Option<Arc<dyn CalendarService<Error = BoxedError>>>,
    pub locks: ResourceLocks,
}

impl BookingState {
    /// The salon's local time zone; all local-to-UTC conversion goes through it.
    pub fn time_zone(&self) -> Tz {
        self.config
            .booking
            .as_ref()
            .and_then(|b| b.time_zone.as_deref())
            .and_then(|name| Tz::from_str(name).ok())
            .unwrap_or(DEFAULT_TIME_ZONE)
    }

    fn lead_time(&self) -> Duration {
        Duration::minutes(
            self.config
                .booking
                .as_ref()
                .and_then(|b| b.lead_time_minutes)
                .unwrap_or(0),
        )
    }

    fn default_calendar_id(&self) -> Option<String> {
        self.config.gcal.as_ref().and_then(|g| g.calendar_id.clone())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            BookingError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            BookingError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            // Conflicts are 400 with a message distinguishing them from
            // generic validation failures
            BookingError::Conflict => (StatusCode::BAD_REQUEST, "Slot already booked".to_string()),
            BookingError::Calculation(_) | BookingError::Database(_) => {
                error!("Booking request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| BookingError::Validation(format!("Invalid {field} format (YYYY-MM-DD)")))
}

/// A missing party size means one person. The upper bound keeps the
/// multiplied duration within anything a real salon would accept.
fn validate_party_size(raw: Option<i64>) -> Result<i64, BookingError> {
    let party_size = raw.unwrap_or(1);
    if !(1..=MAX_PARTY_SIZE).contains(&party_size) {
        return Err(BookingError::Validation(format!(
            "numberOfPeople must be between 1 and {MAX_PARTY_SIZE}"
        )));
    }
    Ok(party_size)
}

/// Handler to get a barber's bookable windows for one day.
#[axum::debug_handler]
pub async fn get_day_availability_handler(
    State(state): State<Arc<BookingState>>,
    Path(barber_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AvailabilityWindow>>, BookingError> {
    let date = parse_date(&query.date, "date")?;
    let party_size = validate_party_size(query.number_of_people)?;

    let barber = state
        .store
        .find_barber(barber_id)
        .await?
        .ok_or_else(|| BookingError::NotFound("Barber not found".to_string()))?;
    let service = state
        .store
        .find_service(query.service_id)
        .await?
        .ok_or_else(|| BookingError::NotFound("Service not found".to_string()))?;
    let assignment = state
        .store
        .assignment_for(barber.id, &query.date)
        .await?
        .ok_or_else(|| BookingError::NotFound("Barber not found".to_string()))?;

    // A barber working at another salon that day has no windows at this one
    if assignment.salon_id != query.saloon_id {
        return Ok(Json(Vec::new()));
    }

    let tz = state.time_zone();
    let booked_rows = state.store.booked_slots(barber.id, &query.date).await?;
    let schedule = ResourceSchedule::resolve(date, &assignment, &booked_rows, tz)?;

    // Suppress past slots when listing today's availability
    let now = Utc::now();
    let earliest = if date == now.with_timezone(&tz).date_naive() {
        Some(now + state.lead_time())
    } else {
        None
    };

    let duration = effective_duration(service.duration_minutes, party_size);
    let slots = schedule.windows(duration, earliest);

    info!(
        "Computed {} available windows for barber {} on {}",
        slots.len(),
        barber.id,
        query.date
    );
    Ok(Json(slots))
}

/// Book one appointment: validate, gate against the freshly fetched booked
/// intervals under the per-barber-day lock, persist, then mirror to the
/// calendar best-effort.
pub async fn book_appointment(
    state: &BookingState,
    payload: BookAppointmentRequest,
) -> Result<BookAppointmentResponse, BookingError> {
    if payload.customer_name.trim().is_empty() {
        return Err(BookingError::Validation(
            "customerName is required".to_string(),
        ));
    }
    if payload.customer_phone.trim().is_empty() {
        return Err(BookingError::Validation(
            "customerPhone is required".to_string(),
        ));
    }
    let party_size = validate_party_size(payload.number_of_people)?;
    let date = parse_date(&payload.date, "date")?;
    let time = parse_slot_time(&payload.time)
        .ok_or_else(|| BookingError::Validation("Invalid time format (HH:MM:SS)".to_string()))?;

    let barber = state
        .store
        .find_barber_by_name(&payload.barber_name)
        .await?
        .ok_or_else(|| BookingError::NotFound("Barber not found".to_string()))?;
    let service = state
        .store
        .find_service(payload.service_id)
        .await?
        .ok_or_else(|| BookingError::NotFound("Service not found".to_string()))?;
    let assignment = state
        .store
        .assignment_for(barber.id, &payload.date)
        .await?
        .ok_or_else(|| BookingError::NotFound("Barber not found".to_string()))?;

    let tz = state.time_zone();
    let (day_start, day_end) = day_bounds(
        date,
        assignment.work_start_hour,
        assignment.work_end_hour,
        tz,
    )?;
    let requested_start = slot_instant(date, time, tz)?;
    let duration = effective_duration(service.duration_minutes, party_size);

    if requested_start < day_start || requested_start + duration > day_end {
        return Err(BookingError::Validation(
            "Requested time is outside working hours".to_string(),
        ));
    }
    if requested_start < Utc::now() {
        return Err(BookingError::Validation(
            "Requested time is in the past".to_string(),
        ));
    }

    // Hold the advisory lock across fetch, free-check and insert so two
    // requests for the same barber-day cannot both pass against the same
    // snapshot. The unique slot index backstops other processes.
    let guard = state.locks.acquire(barber.id, &payload.date).await;

    let booked_rows = state.store.booked_slots(barber.id, &payload.date).await?;
    let schedule = ResourceSchedule::resolve(date, &assignment, &booked_rows, tz)?;
    if !schedule.is_free(requested_start, duration) {
        return Err(BookingError::Conflict);
    }

    let appointment = state
        .store
        .insert_appointment(NewAppointment {
            barber_id: barber.id,
            salon_id: assignment.salon_id,
            service_id: service.id,
            customer_name: payload.customer_name.trim().to_string(),
            customer_phone: payload.customer_phone.trim().to_string(),
            customer_email: payload.customer_email.clone(),
            date: payload.date.clone(),
            time: time.format("%H:%M:%S").to_string(),
            duration_minutes: service.duration_minutes,
            number_of_people: party_size,
            status: "confirmed".to_string(),
        })
        .await?;
    drop(guard);
    // Keep the lock map from accumulating one entry per barber-day forever
    state.locks.prune().await;

    info!(
        "Booked appointment {} for barber {} on {} at {}",
        appointment.id, barber.id, payload.date, payload.time
    );

    // Calendar sync is best-effort: a failure is logged and reported, never
    // rolled back into the persisted booking
    let mut calendar_event = None;
    let mut calendar_warning = None;
    if let Some(calendar) = &state.calendar {
        if let Some(calendar_id) = barber.calendar_id.clone().or_else(|| state.default_calendar_id())
        {
            let event = CalendarEvent {
                start_time: requested_start.to_rfc3339(),
                end_time: (requested_start + duration).to_rfc3339(),
                summary: format!("{} for {}", service.name, appointment.customer_name),
                description: Some(format!("Phone: {}", appointment.customer_phone)),
            };
            match calendar.create_event(&calendar_id, event).await {
                Ok(result) => {
                    if let Some(event_id) = result.event_id {
                        if let Err(e) = state.store.set_calendar_event(appointment.id, &event_id).await
                        {
                            warn!(
                                "Failed to record calendar event for booking {}: {}",
                                appointment.id, e
                            );
                        }
                        calendar_event = Some(event_id);
                    }
                }
                Err(e) => {
                    warn!("Calendar sync failed for booking {}: {}", appointment.id, e);
                    calendar_warning =
                        Some("Calendar sync failed; the booking is confirmed".to_string());
                }
            }
        }
    }

    Ok(BookAppointmentResponse {
        message: "Appointment booked successfully.".to_string(),
        booking_id: appointment.id,
        calendar_event,
        calendar_warning,
    })
}

/// Handler to book a time slot.
#[axum::debug_handler]
pub async fn book_appointment_handler(
    State(state): State<Arc<BookingState>>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<Json<BookAppointmentResponse>, BookingError> {
    book_appointment(&state, payload).await.map(Json)
}

/// Handler to mark an appointment as cancelled. The slot becomes bookable
/// again and any linked calendar event is cancelled best-effort.
#[axum::debug_handler]
pub async fn cancel_appointment_handler(
    State(state): State<Arc<BookingState>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<CancellationResponse>, BookingError> {
    let appointment = state
        .store
        .cancel_appointment(appointment_id)
        .await?
        .ok_or_else(|| BookingError::NotFound("Appointment not found".to_string()))?;

    let mut calendar_warning = None;
    if let (Some(calendar), Some(event_id)) =
        (&state.calendar, appointment.calendar_event_id.as_deref())
    {
        let calendar_id = state
            .store
            .find_barber(appointment.barber_id)
            .await?
            .and_then(|b| b.calendar_id)
            .or_else(|| state.default_calendar_id());
        if let Some(calendar_id) = calendar_id {
            if let Err(e) = calendar.cancel_event(&calendar_id, event_id).await {
                warn!(
                    "Failed to cancel calendar event for appointment {}: {}",
                    appointment.id, e
                );
                calendar_warning =
                    Some("Calendar cancellation failed; the appointment is cancelled".to_string());
            }
        }
    }

    Ok(Json(CancellationResponse {
        success: true,
        message: "Appointment marked as cancelled successfully.".to_string(),
        calendar_warning,
    }))
}

/// Handler to list appointments in a date range (admin dashboard view).
#[axum::debug_handler]
pub async fn list_appointments_handler(
    State(state): State<Arc<BookingState>>,
    Query(query): Query<AppointmentsQuery>,
) -> Result<Json<AppointmentsResponse>, BookingError> {
    let start = parse_date(&query.start_date, "start_date")?;
    let end = parse_date(&query.end_date, "end_date")?;
    if end < start {
        return Err(BookingError::Validation(
            "end_date must be after start_date".to_string(),
        ));
    }

    let appointments = state
        .store
        .list_appointments(
            &query.start_date,
            &query.end_date,
            query.include_cancelled.unwrap_or(false),
        )
        .await?;
    Ok(Json(AppointmentsResponse { appointments }))
}

/// Handler for OPTIONS requests to support CORS preflight
pub async fn options_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Methods", "GET, POST, PATCH, OPTIONS"),
            ("Access-Control-Allow-Headers", "Content-Type"),
            ("Access-Control-Max-Age", "86400"),
        ],
    )
}
