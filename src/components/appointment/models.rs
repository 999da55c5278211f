use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;

/// Untrusted booking payload as received from the client
#[derive(Debug, Clone, Default)]
pub struct RawAppointmentRequest {
    fields: Map<String, Value>,
}

impl RawAppointmentRequest {
    /// Get a string field, non-string values are treated as absent
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl From<Value> for RawAppointmentRequest {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }
}

impl From<Map<String, Value>> for RawAppointmentRequest {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Languages the appointment site is offered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    En,
    Zh,
    Ms,
}

impl Language {
    /// Resolve a language code, anything unknown falls back to English
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("zh") => Language::Zh,
            Some("ms") => Language::Ms,
            _ => Language::En,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
            Language::Ms => "ms",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Validated and sanitized appointment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAppointment {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub customer_name: String,
    pub customer_phone: String,
    pub notes: String,
    pub language: Language,
}
