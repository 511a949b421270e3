// --- File: crates/services/trimbook_backend/src/app_state.rs ---
use std::sync::Arc;
use tracing::info;
use trimbook_booking::handlers::BookingState;
use trimbook_booking::locks::ResourceLocks;
use trimbook_common::services::{BoxedError, CalendarService};
use trimbook_config::AppConfig;
use trimbook_db::{schema, DbClient, DbError, SqlBookingStore};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/trimbook.db";

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Booking handler state (store, calendar, per-barber-day locks).
    pub booking: Arc<BookingState>,
    /// Kept alongside the store for the health probe.
    pub db: DbClient,
}

impl AppState {
    /// Connect to the database, apply the schema and wire up the booking
    /// state, including the optional calendar sync service.
    pub async fn new(config: Arc<AppConfig>) -> Result<Self, DbError> {
        let db = match config.database.as_ref() {
            Some(db_config) => DbClient::from_config(db_config).await?,
            None => DbClient::from_url(DEFAULT_DATABASE_URL).await?,
        };
        trimbook_common::log_result(
            schema::init_schema(&db).await,
            "Database schema ready",
            "Failed to initialize database schema",
        )?;
        let store = Arc::new(SqlBookingStore::new(db.clone()));

        let calendar = build_calendar_service(&config).await;

        let booking = Arc::new(BookingState {
            config: config.clone(),
            store,
            calendar,
            locks: ResourceLocks::new(),
        });
        Ok(Self { booking, db })
    }
}

#[cfg(feature = "gcal")]
async fn build_calendar_service(
    config: &AppConfig,
) -> Option<Arc<dyn CalendarService<Error = BoxedError>>> {
    use tracing::error;
    use trimbook_common::services::{BoxFuture, CalendarEvent, CalendarEventResult};
    use trimbook_gcal::{auth::create_calendar_hub, service::GoogleCalendarService};

    if !config.use_gcal {
        info!("Calendar sync disabled via runtime config");
        return None;
    }
    let Some(gcal_config) = config.gcal.as_ref() else {
        info!("use_gcal is set but the [gcal] config section is missing; calendar sync disabled");
        return None;
    };

    match create_calendar_hub(gcal_config).await {
        Ok(hub) => {
            let service = GoogleCalendarService::new(Arc::new(hub));

            // Adapter erasing the concrete error type so handlers can hold a
            // plain trait object
            struct BoxedCalendarService {
                inner: GoogleCalendarService,
            }

            impl CalendarService for BoxedCalendarService {
                type Error = BoxedError;

                fn create_event(
                    &self,
                    calendar_id: &str,
                    event: CalendarEvent,
                ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
                    let calendar_id = calendar_id.to_string();
                    let inner = &self.inner;

                    Box::pin(async move {
                        inner
                            .create_event(&calendar_id, event)
                            .await
                            .map_err(|e| BoxedError(Box::new(e)))
                    })
                }

                fn cancel_event(
                    &self,
                    calendar_id: &str,
                    event_id: &str,
                ) -> BoxFuture<'_, CalendarEventResult, Self::Error> {
                    let calendar_id = calendar_id.to_string();
                    let event_id = event_id.to_string();
                    let inner = &self.inner;

                    Box::pin(async move {
                        inner
                            .cancel_event(&calendar_id, &event_id)
                            .await
                            .map_err(|e| BoxedError(Box::new(e)))
                    })
                }
            }

            info!("Google Calendar service initialized");
            Some(Arc::new(BoxedCalendarService { inner: service }))
        }
        Err(e) => {
            error!(
                "Failed to initialize Google Calendar service: {}. Calendar sync disabled.",
                e
            );
            None
        }
    }
}

#[cfg(not(feature = "gcal"))]
async fn build_calendar_service(
    config: &AppConfig,
) -> Option<Arc<dyn CalendarService<Error = BoxedError>>> {
    if config.use_gcal {
        info!("use_gcal is set but the binary was built without the gcal feature");
    }
    None
}
