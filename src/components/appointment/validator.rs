use super::models::{Language, NormalizedAppointment, RawAppointmentRequest};
use crate::utils::text::sanitize;
use crate::utils::time::parse_timestamp;
use chrono::Duration;
use thiserror::Error;

pub const MAX_CUSTOMER_NAME_CHARS: usize = 120;
pub const MAX_CUSTOMER_PHONE_CHARS: usize = 80;
pub const MAX_NOTES_CHARS: usize = 1200;

/// Longest appointment that can be booked
pub const MAX_APPOINTMENT_HOURS: i64 = 2;

/// Reasons a booking payload is rejected
///
/// The messages are shown to the person booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("startDateTime and endDateTime are required")]
    RequiredFieldsMissing,

    /// Covers both unparseable timestamps and an end that is not after the start
    #[error("Invalid date/time range")]
    InvalidRange,

    #[error("Appointment duration cannot exceed 2 hours")]
    DurationTooLong,
}

/// Validate a raw booking payload into a normalized appointment
pub fn validate(raw: &RawAppointmentRequest) -> Result<NormalizedAppointment, ValidationFailure> {
    let start_raw = raw.text("startDateTime").filter(|s| !s.trim().is_empty());
    let end_raw = raw.text("endDateTime").filter(|s| !s.trim().is_empty());
    let (Some(start_raw), Some(end_raw)) = (start_raw, end_raw) else {
        return Err(ValidationFailure::RequiredFieldsMissing);
    };

    let (Some(start), Some(end)) = (parse_timestamp(start_raw), parse_timestamp(end_raw)) else {
        return Err(ValidationFailure::InvalidRange);
    };

    if end <= start {
        return Err(ValidationFailure::InvalidRange);
    }

    if end - start > Duration::hours(MAX_APPOINTMENT_HOURS) {
        return Err(ValidationFailure::DurationTooLong);
    }

    let field = |key: &str, max_chars: usize| sanitize(raw.text(key).unwrap_or_default(), max_chars);

    Ok(NormalizedAppointment {
        start,
        end,
        customer_name: field("customerName", MAX_CUSTOMER_NAME_CHARS),
        customer_phone: field("customerPhone", MAX_CUSTOMER_PHONE_CHARS),
        notes: field("notes", MAX_NOTES_CHARS),
        language: Language::from_code(raw.text("language")),
    })
}
