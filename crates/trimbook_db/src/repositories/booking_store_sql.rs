//! SQL implementation of the booking store
//!
//! Manual row mapping via `Row::try_get` is used throughout instead of
//! `query_as`, since the `sqlx::Any` driver does not decode every chrono type.
//! Stored dates and times stay plain TEXT all the way through.

use crate::client::DbClient;
use crate::error::DbError;
use crate::repositories::booking_store::{
    Appointment, Barber, BarberAssignment, BookedSlot, BookingStore, NewAppointment,
    ServiceOffering,
};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};
use trimbook_common::services::BoxFuture;

/// SQL implementation of the booking store
#[derive(Debug, Clone)]
pub struct SqlBookingStore {
    db_client: DbClient,
}

impl SqlBookingStore {
    /// Create a new SQL booking store
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// Access the underlying client, e.g. for health checks.
    pub fn client(&self) -> &DbClient {
        &self.db_client
    }

    fn barber_from_row(row: &AnyRow) -> Result<Barber, DbError> {
        Ok(Barber {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            salon_id: row.try_get("salon_id")?,
            work_start_hour: row.try_get::<i64, _>("work_start_hour")? as u32,
            work_end_hour: row.try_get::<i64, _>("work_end_hour")? as u32,
            calendar_id: row.try_get("calendar_id")?,
        })
    }

    fn appointment_from_row(row: &AnyRow) -> Result<Appointment, DbError> {
        Ok(Appointment {
            id: row.try_get("id")?,
            barber_id: row.try_get("barber_id")?,
            salon_id: row.try_get("salon_id")?,
            service_id: row.try_get("service_id")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            customer_email: row.try_get("customer_email")?,
            date: row.try_get("date")?,
            time: row.try_get("time")?,
            duration_minutes: row.try_get("duration_minutes")?,
            number_of_people: row.try_get("number_of_people")?,
            status: row.try_get("status")?,
            calendar_event_id: row.try_get("calendar_event_id")?,
        })
    }

    // --- Seed helpers (no HTTP surface; used at bring-up and in tests) ---

    pub async fn create_salon(&self, name: &str, address: Option<&str>) -> Result<i64, DbError> {
        let row = sqlx::query("INSERT INTO salons (name, address) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(address)
            .fetch_one(self.db_client.pool())
            .await?;
        Ok(row.try_get("id")?)
    }

    pub async fn create_service(
        &self,
        name: &str,
        duration_minutes: i64,
        price_cents: i64,
        currency: &str,
    ) -> Result<i64, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO services (name, duration_minutes, price_cents, currency)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(duration_minutes)
        .bind(price_cents)
        .bind(currency)
        .fetch_one(self.db_client.pool())
        .await?;
        Ok(row.try_get("id")?)
    }

    pub async fn create_barber(
        &self,
        name: &str,
        salon_id: i64,
        work_start_hour: u32,
        work_end_hour: u32,
        calendar_id: Option<&str>,
    ) -> Result<i64, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO barbers (name, salon_id, work_start_hour, work_end_hour, calendar_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(salon_id)
        .bind(work_start_hour as i64)
        .bind(work_end_hour as i64)
        .bind(calendar_id)
        .fetch_one(self.db_client.pool())
        .await?;
        Ok(row.try_get("id")?)
    }

    /// Set a per-date schedule override for a barber. `None` fields fall back
    /// to the barber's defaults when the assignment is resolved.
    pub async fn upsert_override(
        &self,
        barber_id: i64,
        date: &str,
        salon_id: Option<i64>,
        work_start_hour: Option<u32>,
        work_end_hour: Option<u32>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO schedule_overrides (barber_id, date, salon_id, work_start_hour, work_end_hour)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT(barber_id, date) DO UPDATE
            SET salon_id = excluded.salon_id,
                work_start_hour = excluded.work_start_hour,
                work_end_hour = excluded.work_end_hour
            "#,
        )
        .bind(barber_id)
        .bind(date)
        .bind(salon_id)
        .bind(work_start_hour.map(|h| h as i64))
        .bind(work_end_hour.map(|h| h as i64))
        .execute(self.db_client.pool())
        .await?;
        Ok(())
    }
}

impl BookingStore for SqlBookingStore {
    fn find_barber(&self, barber_id: i64) -> BoxFuture<'_, Option<Barber>, DbError> {
        Box::pin(async move {
            let row = sqlx::query("SELECT * FROM barbers WHERE id = $1")
                .bind(barber_id)
                .fetch_optional(self.db_client.pool())
                .await?;
            row.as_ref().map(Self::barber_from_row).transpose()
        })
    }

    fn find_barber_by_name(&self, name: &str) -> BoxFuture<'_, Option<Barber>, DbError> {
        let name = name.to_string();
        Box::pin(async move {
            let row = sqlx::query("SELECT * FROM barbers WHERE name = $1")
                .bind(&name)
                .fetch_optional(self.db_client.pool())
                .await?;
            row.as_ref().map(Self::barber_from_row).transpose()
        })
    }

    fn find_service(&self, service_id: i64) -> BoxFuture<'_, Option<ServiceOffering>, DbError> {
        Box::pin(async move {
            let row = sqlx::query("SELECT * FROM services WHERE id = $1")
                .bind(service_id)
                .fetch_optional(self.db_client.pool())
                .await?;
            row.map(|row| {
                Ok::<_, DbError>(ServiceOffering {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    duration_minutes: row.try_get("duration_minutes")?,
                    price_cents: row.try_get("price_cents")?,
                    currency: row.try_get("currency")?,
                })
            })
            .transpose()
        })
    }

    fn assignment_for(
        &self,
        barber_id: i64,
        date: &str,
    ) -> BoxFuture<'_, Option<BarberAssignment>, DbError> {
        let date = date.to_string();
        Box::pin(async move {
            let Some(barber) = self.find_barber(barber_id).await? else {
                return Ok(None);
            };

            let override_row = sqlx::query(
                "SELECT salon_id, work_start_hour, work_end_hour FROM schedule_overrides \
                 WHERE barber_id = $1 AND date = $2",
            )
            .bind(barber_id)
            .bind(&date)
            .fetch_optional(self.db_client.pool())
            .await?;

            let mut assignment = BarberAssignment {
                salon_id: barber.salon_id,
                work_start_hour: barber.work_start_hour,
                work_end_hour: barber.work_end_hour,
            };

            if let Some(row) = override_row {
                debug!("Applying schedule override for barber {} on {}", barber_id, date);
                if let Some(salon_id) = row.try_get::<Option<i64>, _>("salon_id")? {
                    assignment.salon_id = salon_id;
                }
                if let Some(start) = row.try_get::<Option<i64>, _>("work_start_hour")? {
                    assignment.work_start_hour = start as u32;
                }
                if let Some(end) = row.try_get::<Option<i64>, _>("work_end_hour")? {
                    assignment.work_end_hour = end as u32;
                }
            }

            Ok(Some(assignment))
        })
    }

    fn booked_slots(
        &self,
        barber_id: i64,
        date: &str,
    ) -> BoxFuture<'_, Vec<BookedSlot>, DbError> {
        let date = date.to_string();
        Box::pin(async move {
            let rows = sqlx::query(
                "SELECT time, duration_minutes, number_of_people FROM appointments \
                 WHERE barber_id = $1 AND date = $2 AND status <> 'cancelled' \
                 ORDER BY time ASC",
            )
            .bind(barber_id)
            .bind(&date)
            .fetch_all(self.db_client.pool())
            .await?;

            rows.into_iter()
                .map(|row| {
                    Ok(BookedSlot {
                        time: row.try_get("time")?,
                        duration_minutes: row.try_get("duration_minutes")?,
                        number_of_people: row.try_get("number_of_people")?,
                    })
                })
                .collect()
        })
    }

    fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> BoxFuture<'_, Appointment, DbError> {
        Box::pin(async move {
            debug!(
                "Inserting appointment for barber {} on {} at {}",
                appointment.barber_id, appointment.date, appointment.time
            );

            let row = sqlx::query(
                r#"
                INSERT INTO appointments (
                    barber_id, salon_id, service_id, customer_name, customer_phone,
                    customer_email, date, time, duration_minutes, number_of_people, status
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                RETURNING *
                "#,
            )
            .bind(appointment.barber_id)
            .bind(appointment.salon_id)
            .bind(appointment.service_id)
            .bind(&appointment.customer_name)
            .bind(&appointment.customer_phone)
            .bind(&appointment.customer_email)
            .bind(&appointment.date)
            .bind(&appointment.time)
            .bind(appointment.duration_minutes)
            .bind(appointment.number_of_people)
            .bind(&appointment.status)
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    info!(
                        "Slot collision on insert for barber {} at {} {}",
                        appointment.barber_id, appointment.date, appointment.time
                    );
                    DbError::UniqueViolation
                }
                _ => {
                    error!("Failed to insert appointment: {}", e);
                    DbError::QueryError(e.to_string())
                }
            })?;

            Self::appointment_from_row(&row)
        })
    }

    fn set_calendar_event(
        &self,
        appointment_id: i64,
        event_id: &str,
    ) -> BoxFuture<'_, (), DbError> {
        let event_id = event_id.to_string();
        Box::pin(async move {
            sqlx::query("UPDATE appointments SET calendar_event_id = $1 WHERE id = $2")
                .bind(&event_id)
                .bind(appointment_id)
                .execute(self.db_client.pool())
                .await?;
            Ok(())
        })
    }

    fn cancel_appointment(
        &self,
        appointment_id: i64,
    ) -> BoxFuture<'_, Option<Appointment>, DbError> {
        Box::pin(async move {
            let row = sqlx::query(
                "UPDATE appointments SET status = 'cancelled' WHERE id = $1 RETURNING *",
            )
            .bind(appointment_id)
            .fetch_optional(self.db_client.pool())
            .await?;
            row.as_ref().map(Self::appointment_from_row).transpose()
        })
    }

    fn list_appointments(
        &self,
        start_date: &str,
        end_date: &str,
        include_cancelled: bool,
    ) -> BoxFuture<'_, Vec<Appointment>, DbError> {
        let start_date = start_date.to_string();
        let end_date = end_date.to_string();
        Box::pin(async move {
            // YYYY-MM-DD strings order lexicographically, so BETWEEN works
            let query = if include_cancelled {
                "SELECT * FROM appointments WHERE date BETWEEN $1 AND $2 \
                 ORDER BY date DESC, time ASC"
            } else {
                "SELECT * FROM appointments WHERE date BETWEEN $1 AND $2 \
                 AND status <> 'cancelled' ORDER BY date DESC, time ASC"
            };
            let rows = sqlx::query(query)
                .bind(&start_date)
                .bind(&end_date)
                .fetch_all(self.db_client.pool())
                .await?;
            rows.iter().map(Self::appointment_from_row).collect()
        })
    }
}
