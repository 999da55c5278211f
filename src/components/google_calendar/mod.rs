pub mod client;
pub mod models;
pub mod submitter;
pub mod token;

pub use client::{CalendarClient, GoogleCalendarClient};
pub use models::{CalendarEvent, CreatedEvent, EventDateTime};
pub use submitter::{build_event, submit, SubmissionOutcome};
