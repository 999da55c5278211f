use super::appointment::{validate, RawAppointmentRequest};
use super::google_calendar::{submit, CalendarClient, SubmissionOutcome};
use crate::config::CalendarSettings;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Books appointments on the configured calendar
#[derive(Clone)]
pub struct BookingService {
    settings: Arc<CalendarSettings>,
    client: Arc<dyn CalendarClient>,
}

impl fmt::Debug for BookingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingService")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl BookingService {
    pub fn new(settings: Arc<CalendarSettings>, client: Arc<dyn CalendarClient>) -> Self {
        Self { settings, client }
    }

    /// Validate a booking payload and create the calendar event for it
    ///
    /// Configuration is checked first so no work is done for a service that
    /// cannot reach its calendar.
    pub async fn book(&self, raw: &RawAppointmentRequest) -> SubmissionOutcome {
        let span = info_span!("booking", request_id = %Uuid::new_v4());

        async move {
            if !self.settings.is_configured() {
                warn!("Rejecting appointment, Google Calendar is not configured");
                return SubmissionOutcome::ConfigurationMissing;
            }

            let appointment = match validate(raw) {
                Ok(appointment) => appointment,
                Err(reason) => {
                    debug!("Appointment request rejected: {}", reason);
                    return reason.into();
                }
            };

            let outcome = submit(&appointment, &self.settings, self.client.as_ref()).await;
            if let SubmissionOutcome::Created { event_id, .. } = &outcome {
                info!("Booked appointment {} for {}", event_id, appointment.start);
            }

            outcome
        }
        .instrument(span)
        .await
    }
}
