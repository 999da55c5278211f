use miette::{Diagnostic, Result};
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Environment error: {0}")]
    #[diagnostic(code(anacoo::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(anacoo::config))]
    Config(String),

    #[error("Google Calendar API error: {0}")]
    #[diagnostic(code(anacoo::google_calendar))]
    GoogleCalendar(String),

    #[error(transparent)]
    #[diagnostic(code(anacoo::io))]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    #[diagnostic(code(anacoo::other))]
    Other(String),
}

/// Type alias for Result with our Error type
pub type BookingResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Environment variable {} is not valid unicode", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create Google Calendar errors
pub fn google_calendar_error(message: &str) -> Error {
    Error::GoogleCalendar(message.to_string())
}

/// Helper to create other errors
pub fn other_error(message: &str) -> Error {
    Error::Other(message.to_string())
}
