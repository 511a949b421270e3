//! Repository traits and implementations for Trimbook storage access

pub mod booking_store;
pub mod booking_store_sql;

pub use booking_store::{
    Appointment, Barber, BarberAssignment, BookedSlot, BookingStore, NewAppointment,
    ServiceOffering,
};
pub use booking_store_sql::SqlBookingStore;
