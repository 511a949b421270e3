// --- File: crates/trimbook_gcal/src/service.rs ---
//! Google Calendar service implementation.
//!
//! Bookings live in the local appointment store; the calendar is a mirror
//! only. Events are created after a booking is persisted and marked cancelled
//! when the appointment is cancelled, without any availability checks here.

use chrono::{DateTime, Utc};
use google_calendar3::api::{Event, EventDateTime};
use std::sync::Arc;
use thiserror::Error;
use trimbook_common::services::{BoxFuture, CalendarEvent, CalendarEventResult, CalendarService};

use crate::auth::HubType;

/// Errors that can occur when interacting with Google Calendar.
#[derive(Error, Debug)]
pub enum GcalServiceError {
    #[error("Google API Error: {0}")]
    ApiError(#[from] google_calendar3::Error),
    #[error("Failed to parse time: {0}")]
    TimeParseError(String),
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

/// Google Calendar service implementation.
pub struct GoogleCalendarService {
    calendar_hub: Arc<HubType>,
}

impl GoogleCalendarService {
    /// Create a new Google Calendar service.
    pub fn new(calendar_hub: Arc<HubType>) -> Self {
        Self { calendar_hub }
    }
}

impl CalendarService for GoogleCalendarService {
    type Error = GcalServiceError;

    /// Creates a calendar event mirroring a persisted appointment.
    ///
    /// Start and end are RFC 3339 strings as carried by [`CalendarEvent`];
    /// the event is stored in UTC.
    fn create_event(
        &self,
        calendar_id: &str,
        event: CalendarEvent,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let start_dt = DateTime::parse_from_rfc3339(&event.start_time)
                .map_err(|e| GcalServiceError::TimeParseError(format!("Invalid start_time: {}", e)))?
                .with_timezone(&Utc);
            let end_dt = DateTime::parse_from_rfc3339(&event.end_time)
                .map_err(|e| GcalServiceError::TimeParseError(format!("Invalid end_time: {}", e)))?
                .with_timezone(&Utc);

            if end_dt <= start_dt {
                return Err(GcalServiceError::InvalidEvent(
                    "End time must be after start time".to_string(),
                ));
            }

            let new_event = Event {
                summary: Some(event.summary),
                description: event.description,
                start: Some(EventDateTime {
                    date_time: Some(start_dt),
                    time_zone: Some("UTC".to_string()),
                    ..Default::default()
                }),
                end: Some(EventDateTime {
                    date_time: Some(end_dt),
                    time_zone: Some("UTC".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            };

            let (_response, created_event) = calendar_hub
                .events()
                .insert(new_event, &calendar_id)
                .doit()
                .await?;

            Ok(CalendarEventResult {
                event_id: created_event.id,
                status: created_event
                    .status
                    .unwrap_or_else(|| "confirmed".to_string()),
            })
        })
    }

    /// Marks an event as cancelled without deleting it.
    ///
    /// The event stays visible in the calendar (usually with strikethrough).
    /// The sequence number is bumped so the change propagates to all calendar
    /// instances.
    fn cancel_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
        let calendar_id = calendar_id.to_string();
        let event_id = event_id.to_string();
        let calendar_hub = self.calendar_hub.clone();

        Box::pin(async move {
            let (_response, event) = calendar_hub
                .events()
                .get(&calendar_id, &event_id)
                .doit()
                .await?;

            let sequence = event.sequence.map(|n| n + 1).unwrap_or(1);

            let cancelled_event = Event {
                status: Some("cancelled".to_string()),
                sequence: Some(sequence),
                ..Default::default()
            };

            let (_response, updated) = calendar_hub
                .events()
                .patch(cancelled_event, &calendar_id, &event_id)
                .send_updates("none")
                .doit()
                .await?;

            Ok(CalendarEventResult {
                event_id: updated.id,
                status: updated.status.unwrap_or_else(|| "cancelled".to_string()),
            })
        })
    }
}
