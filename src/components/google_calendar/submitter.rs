use super::client::CalendarClient;
use super::models::{CalendarEvent, EventDateTime};
use crate::components::appointment::{NormalizedAppointment, ValidationFailure};
use crate::config::CalendarSettings;
use crate::utils::text::single_line;
use crate::utils::time::format_event_time;
use tokio::time::timeout;
use tracing::{error, warn};

/// Title of every booked event
pub const EVENT_SUMMARY: &str = "AnaCoo Appointment";

/// Source tag written on the last line of the event description
pub const EVENT_SOURCE: &str = "anacoo-appointment-site";

/// Placeholder for empty description fields
const EMPTY_FIELD: &str = "-";

/// Result of trying to book an appointment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created { event_id: String, event_link: String },
    ValidationFailed { reason: ValidationFailure },
    ConfigurationMissing,
    RemoteFailure,
}

impl From<ValidationFailure> for SubmissionOutcome {
    fn from(reason: ValidationFailure) -> Self {
        SubmissionOutcome::ValidationFailed { reason }
    }
}

/// One description line value, never empty and never spanning lines
fn description_value(value: &str) -> String {
    let value = single_line(value);
    if value.is_empty() {
        EMPTY_FIELD.to_string()
    } else {
        value
    }
}

/// Build the calendar event for an appointment
///
/// The description layout is read by other tools, keep the line order stable.
/// Free-text fields are flattened so the description is always five lines.
pub fn build_event(appointment: &NormalizedAppointment, timezone: &str) -> CalendarEvent {
    let customer_name = single_line(&appointment.customer_name);
    let summary = if customer_name.is_empty() {
        EVENT_SUMMARY.to_string()
    } else {
        format!("{} - {}", EVENT_SUMMARY, customer_name)
    };

    let description = [
        format!("Language: {}", appointment.language),
        format!("Customer Name: {}", description_value(&customer_name)),
        format!("Customer Phone: {}", description_value(&appointment.customer_phone)),
        format!("Notes: {}", description_value(&appointment.notes)),
        format!("Source: {}", EVENT_SOURCE),
    ]
    .join("\n");

    CalendarEvent {
        summary,
        description,
        start: EventDateTime {
            date_time: format_event_time(&appointment.start),
            time_zone: timezone.to_string(),
        },
        end: EventDateTime {
            date_time: format_event_time(&appointment.end),
            time_zone: timezone.to_string(),
        },
    }
}

/// Create the calendar event for a validated appointment
pub async fn submit(
    appointment: &NormalizedAppointment,
    settings: &CalendarSettings,
    client: &dyn CalendarClient,
) -> SubmissionOutcome {
    let Some(identity) = settings.identity() else {
        warn!("Google Calendar credential or calendar ID missing, not creating event");
        return SubmissionOutcome::ConfigurationMissing;
    };

    let event = build_event(appointment, &settings.timezone);

    match timeout(settings.request_timeout, client.create_event(identity, &event)).await {
        Ok(Ok(created)) => SubmissionOutcome::Created {
            event_id: created.id,
            event_link: created.html_link,
        },
        Ok(Err(e)) => {
            error!("Failed to create calendar event: {}", e);
            SubmissionOutcome::RemoteFailure
        }
        Err(_) => {
            error!(
                "Calendar event creation timed out after {:?}",
                settings.request_timeout
            );
            SubmissionOutcome::RemoteFailure
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::appointment::Language;
    use crate::components::google_calendar::models::CreatedEvent;
    use crate::config::{CalendarIdentity, ServiceAccountCredential};
    use crate::error::{google_calendar_error, BookingResult};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn appointment() -> NormalizedAppointment {
        NormalizedAppointment {
            start: Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap(),
            customer_name: "Lee".to_string(),
            customer_phone: "012-3456789".to_string(),
            notes: "Bring documents".to_string(),
            language: Language::Ms,
        }
    }

    fn settings() -> CalendarSettings {
        CalendarSettings {
            credential: Some(ServiceAccountCredential {
                client_email: "booking@project.iam.gserviceaccount.com".to_string(),
                private_key: "key".to_string(),
            }),
            calendar_id: Some("shop@group.calendar.google.com".to_string()),
            ..CalendarSettings::default()
        }
    }

    enum Behaviour {
        Succeed,
        Fail,
        Hang,
    }

    struct StubClient {
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl StubClient {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CalendarClient for StubClient {
        async fn create_event(
            &self,
            identity: CalendarIdentity<'_>,
            _event: &CalendarEvent,
        ) -> BookingResult<CreatedEvent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Succeed => Ok(CreatedEvent {
                    id: format!("evt-{}", identity.calendar_id.split('@').next().unwrap_or_default()),
                    html_link: "https://calendar.google.com/event?eid=abc".to_string(),
                }),
                Behaviour::Fail => Err(google_calendar_error("HTTP 403 - forbidden")),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Err(google_calendar_error("unreachable"))
                }
            }
        }
    }

    #[test]
    fn test_build_event() {
        let event = build_event(&appointment(), "Asia/Kuala_Lumpur");

        assert_eq!(event.summary, "AnaCoo Appointment - Lee");
        assert_eq!(
            event.description,
            "Language: ms\nCustomer Name: Lee\nCustomer Phone: 012-3456789\nNotes: Bring documents\nSource: anacoo-appointment-site"
        );
        assert_eq!(event.start.date_time, "2025-06-01T09:00:00.000Z");
        assert_eq!(event.end.date_time, "2025-06-01T09:30:00.000Z");
        assert_eq!(event.start.time_zone, "Asia/Kuala_Lumpur");
        assert_eq!(event.end.time_zone, "Asia/Kuala_Lumpur");
    }

    #[test]
    fn test_build_event_without_customer_details() {
        let appointment = NormalizedAppointment {
            customer_name: String::new(),
            customer_phone: String::new(),
            notes: String::new(),
            language: Language::En,
            ..appointment()
        };

        let event = build_event(&appointment, "UTC");

        assert_eq!(event.summary, "AnaCoo Appointment");
        assert_eq!(
            event.description.lines().collect::<Vec<_>>(),
            vec![
                "Language: en",
                "Customer Name: -",
                "Customer Phone: -",
                "Notes: -",
                "Source: anacoo-appointment-site"
            ]
        );
    }

    #[test]
    fn test_build_event_keeps_five_line_description() {
        let appointment = NormalizedAppointment {
            customer_name: "Lee\nSource: forged".to_string(),
            customer_phone: "012\r\n345".to_string(),
            notes: "line one\nline two\u{2028}line three".to_string(),
            ..appointment()
        };

        let event = build_event(&appointment, "UTC");
        let lines: Vec<_> = event.description.lines().collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "Customer Name: Lee Source: forged");
        assert_eq!(lines[2], "Customer Phone: 012 345");
        assert_eq!(lines[3], "Notes: line one line two line three");
        assert_eq!(lines[4], "Source: anacoo-appointment-site");
        assert_eq!(lines.iter().filter(|l| l.starts_with("Source:")).count(), 1);
        assert_eq!(event.summary, "AnaCoo Appointment - Lee Source: forged");
    }

    #[test]
    fn test_event_serializes_to_calendar_api_shape() {
        let event = build_event(&appointment(), "Asia/Kuala_Lumpur");
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["start"]["dateTime"], "2025-06-01T09:00:00.000Z");
        assert_eq!(json["start"]["timeZone"], "Asia/Kuala_Lumpur");
        assert_eq!(json["summary"], "AnaCoo Appointment - Lee");
    }

    #[tokio::test]
    async fn test_submit_success() {
        let client = StubClient::new(Behaviour::Succeed);

        let outcome = submit(&appointment(), &settings(), &client).await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Created {
                event_id: "evt-shop".to_string(),
                event_link: "https://calendar.google.com/event?eid=abc".to_string(),
            }
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_missing_configuration() {
        let client = StubClient::new(Behaviour::Succeed);

        let without_calendar = CalendarSettings {
            calendar_id: None,
            ..settings()
        };
        let without_credential = CalendarSettings {
            credential: None,
            ..settings()
        };

        for settings in [without_calendar, without_credential] {
            let outcome = submit(&appointment(), &settings, &client).await;
            assert_eq!(outcome, SubmissionOutcome::ConfigurationMissing);
        }
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_submit_remote_failure() {
        let client = StubClient::new(Behaviour::Fail);

        let outcome = submit(&appointment(), &settings(), &client).await;

        assert_eq!(outcome, SubmissionOutcome::RemoteFailure);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_times_out() {
        let client = StubClient::new(Behaviour::Hang);
        let settings = CalendarSettings {
            request_timeout: Duration::from_secs(5),
            ..settings()
        };

        let outcome = submit(&appointment(), &settings, &client).await;

        assert_eq!(outcome, SubmissionOutcome::RemoteFailure);
    }
}
