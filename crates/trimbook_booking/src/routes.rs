// --- File: crates/trimbook_booking/src/routes.rs ---

use crate::handlers::{
    book_appointment_handler, cancel_appointment_handler, get_day_availability_handler,
    list_appointments_handler, options_handler, BookingState,
};
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing all routes for the booking feature.
/// The caller assembles `BookingState` (store, optional calendar, locks).
pub fn routes(state: Arc<BookingState>) -> Router {
    Router::new()
        .route(
            "/barbers/{barber_id}/availability/day",
            get(get_day_availability_handler),
        )
        .route(
            "/appointments/book",
            post(book_appointment_handler).options(options_handler),
        )
        .route("/admin/appointments", get(list_appointments_handler))
        .route(
            "/admin/appointments/{appointment_id}/cancel",
            patch(cancel_appointment_handler),
        )
        .with_state(state)
}
