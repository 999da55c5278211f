// Export components
pub mod appointment;
pub mod booking;
pub mod google_calendar;

pub use booking::BookingService;
pub use google_calendar::{CalendarClient, GoogleCalendarClient, SubmissionOutcome};
