// File: crates/trimbook_booking/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{
    AppointmentsQuery, AvailabilityQuery, AvailabilityWindow, BookAppointmentRequest,
    BookAppointmentResponse, CancellationResponse,
};

#[utoipa::path(
    get,
    path = "/barbers/{barber_id}/availability/day",
    params(
        ("barber_id" = i64, Path, description = "Barber to compute availability for"),
        ("saloonId" = i64, Query, description = "Salon the customer is booking at"),
        ("serviceId" = i64, Query, description = "Requested service"),
        ("date" = String, Query, description = "Date in YYYY-MM-DD format", example = "2026-09-14", format = "date"),
        ("numberOfPeople" = Option<i64>, Query, description = "Party size; defaults to 1")
    ),
    responses(
        (status = 200, description = "Bookable windows, empty when the barber works elsewhere that day", body = Vec<AvailabilityWindow>),
        (status = 400, description = "Malformed date or party size",
         example = json!({"error": "Invalid date format (YYYY-MM-DD)"})),
        (status = 404, description = "Unknown barber or service",
         example = json!({"error": "Barber not found"}))
    )
)]
fn doc_get_day_availability_handler() {}

#[utoipa::path(
    post,
    path = "/appointments/book",
    request_body(content = BookAppointmentRequest, example = json!({
        "barberName": "Ivan",
        "customerName": "Maria Petrova",
        "customerPhone": "+359888000111",
        "customerEmail": "maria@example.com",
        "date": "2026-09-14",
        "time": "10:00:00",
        "serviceId": 1,
        "numberOfPeople": 1
    })),
    responses(
        (status = 200, description = "Booking result", body = BookAppointmentResponse,
         example = json!({
             "message": "Appointment booked successfully.",
             "bookingId": 42,
             "calendarEvent": "abc123xyz456"
         })
        ),
        (status = 400, description = "Slot already booked, or validation failure",
         example = json!({"error": "Slot already booked"})),
        (status = 404, description = "Unknown barber or service",
         example = json!({"error": "Service not found"}))
    )
)]
fn doc_book_appointment_handler() {}

#[utoipa::path(
    get,
    path = "/admin/appointments",
    params(
        ("start_date" = String, Query, description = "Start date in YYYY-MM-DD format", example = "2026-09-01", format = "date"),
        ("end_date" = String, Query, description = "End date in YYYY-MM-DD format", example = "2026-09-30", format = "date"),
        ("include_cancelled" = Option<bool>, Query, description = "Whether to include cancelled appointments", example = false)
    ),
    responses(
        (status = 200, description = "Appointments in the date range",
         example = json!({
             "appointments": [
                 {
                     "id": 42,
                     "barberId": 1,
                     "salonId": 1,
                     "serviceId": 1,
                     "customerName": "Maria Petrova",
                     "customerPhone": "+359888000111",
                     "date": "2026-09-14",
                     "time": "10:00:00",
                     "durationMinutes": 30,
                     "numberOfPeople": 1,
                     "status": "confirmed"
                 }
             ]
         })
        ),
        (status = 400, description = "Invalid date range",
         example = json!({"error": "end_date must be after start_date"}))
    )
)]
fn doc_list_appointments_handler() {}

#[utoipa::path(
    patch,
    path = "/admin/appointments/{appointment_id}/cancel",
    params(
        ("appointment_id" = i64, Path, description = "The appointment to mark as cancelled")
    ),
    responses(
        (status = 200, description = "Cancellation result", body = CancellationResponse,
         example = json!({
             "success": true,
             "message": "Appointment marked as cancelled successfully."
         })
        ),
        (status = 404, description = "Appointment not found",
         example = json!({"error": "Appointment not found"}))
    )
)]
fn doc_cancel_appointment_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_get_day_availability_handler,
        doc_book_appointment_handler,
        doc_list_appointments_handler,
        doc_cancel_appointment_handler
    ),
    components(
        schemas(
            AvailabilityQuery,
            AvailabilityWindow,
            BookAppointmentRequest,
            BookAppointmentResponse,
            AppointmentsQuery,
            CancellationResponse
        )
    ),
    tags(
        (name = "booking", description = "Salon appointment booking API")
    ),
    servers(
        (url = "/api", description = "Trimbook API server")
    )
)]
pub struct BookingApiDoc;
