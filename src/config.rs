use crate::error::{config_error, env_error, BookingResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use std::env::{self, VarError};
use std::fmt;
use std::time::Duration;
use tracing::warn;

/// Timezone attached to calendar events when `CALENDAR_TIMEZONE` is unset
pub const DEFAULT_TIMEZONE: &str = "Asia/Kuala_Lumpur";

/// Default port for the HTTP server
pub const DEFAULT_PORT: u16 = 3000;

/// Default upper bound for a single calendar API call, in seconds
pub const DEFAULT_CALENDAR_TIMEOUT_SECS: u64 = 10;

/// Default directory holding the appointment site
pub const DEFAULT_STATIC_DIR: &str = "public";

/// Google service account credential used to authenticate against the Calendar API
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceAccountCredential {
    /// Service account email, used as the JWT issuer
    pub client_email: String,
    /// PEM encoded RSA private key
    pub private_key: String,
}

impl fmt::Debug for ServiceAccountCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountCredential")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Everything needed to create an event on a specific calendar
#[derive(Debug, Clone, Copy)]
pub struct CalendarIdentity<'a> {
    pub credential: &'a ServiceAccountCredential,
    pub calendar_id: &'a str,
}

/// Calendar related settings
#[derive(Debug, Clone)]
pub struct CalendarSettings {
    /// Service account credential, absent when not configured
    pub credential: Option<ServiceAccountCredential>,
    /// Target calendar ID, absent when not configured
    pub calendar_id: Option<String>,
    /// Timezone identifier attached to event start and end
    pub timezone: String,
    /// Upper bound for a single create-event call
    pub request_timeout: Duration,
}

impl CalendarSettings {
    /// Returns the calendar identity if both the credential and the calendar ID are present
    pub fn identity(&self) -> Option<CalendarIdentity<'_>> {
        match (&self.credential, &self.calendar_id) {
            (Some(credential), Some(calendar_id)) => Some(CalendarIdentity {
                credential,
                calendar_id,
            }),
            _ => None,
        }
    }

    /// Check if the calendar integration can be used
    pub fn is_configured(&self) -> bool {
        self.identity().is_some()
    }
}

impl Default for CalendarSettings {
    fn default() -> Self {
        Self {
            credential: None,
            calendar_id: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_CALENDAR_TIMEOUT_SECS),
        }
    }
}

/// Main configuration structure for the service
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Calendar settings
    pub calendar: CalendarSettings,
    /// Origins allowed by CORS, empty means any origin
    pub allowed_origins: Vec<String>,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Directory with the static appointment site
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            calendar: CalendarSettings::default(),
            allowed_origins: Vec::new(),
            port: DEFAULT_PORT,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, reading `.env` first if it exists
    pub fn load() -> BookingResult<Self> {
        dotenv().ok();

        Self::from_lookup(|key| match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(env_error(key)),
        })
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> BookingResult<Self>
    where
        F: Fn(&str) -> BookingResult<Option<String>>,
    {
        // Blank values count as unset
        let get = |key: &str| -> BookingResult<Option<String>> {
            Ok(lookup(key)?
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty()))
        };

        let client_email = get("GOOGLE_CLIENT_EMAIL")?;
        // Keys pasted into .env files usually carry escaped newlines
        let private_key = get("GOOGLE_PRIVATE_KEY")?.map(|key| key.replace("\\n", "\n"));
        let credential = match (client_email, private_key) {
            (Some(client_email), Some(private_key)) => Some(ServiceAccountCredential {
                client_email,
                private_key,
            }),
            _ => None,
        };

        let calendar_id = get("GOOGLE_CALENDAR_ID")?;

        let timezone = get("CALENDAR_TIMEZONE")?.unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        if timezone.parse::<Tz>().is_err() {
            warn!("CALENDAR_TIMEZONE '{}' is not a known timezone, passing it through as-is", timezone);
        }

        let timeout_secs = match get("CALENDAR_TIMEOUT_SECS")? {
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| config_error("Invalid CALENDAR_TIMEOUT_SECS format"))?,
            None => DEFAULT_CALENDAR_TIMEOUT_SECS,
        };

        let allowed_origins = get("ALLOWED_ORIGIN")?
            .map(|origins| {
                origins
                    .split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let port = match get("PORT")? {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| config_error("Invalid PORT format"))?,
            None => DEFAULT_PORT,
        };

        let static_dir = get("STATIC_DIR")?.unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string());

        let config = Config {
            calendar: CalendarSettings {
                credential,
                calendar_id,
                timezone,
                request_timeout: Duration::from_secs(timeout_secs),
            },
            allowed_origins,
            port,
            static_dir,
        };

        if config.calendar.credential.is_none() {
            warn!("GOOGLE_CLIENT_EMAIL or GOOGLE_PRIVATE_KEY is not set, appointments will be rejected");
        }
        if config.calendar.calendar_id.is_none() {
            warn!("GOOGLE_CALENDAR_ID is not set, appointments will be rejected");
        }

        Ok(config)
    }
}
