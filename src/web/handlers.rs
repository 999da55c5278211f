use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use super::AppState;
use crate::components::appointment::RawAppointmentRequest;
use crate::components::SubmissionOutcome;

pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON body";
pub const NOT_CONFIGURED_MESSAGE: &str = "Calendar integration is not configured";
pub const REMOTE_FAILURE_MESSAGE: &str = "Failed to create calendar event";

/// Body returned for a booked appointment
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub ok: bool,
    pub event_id: String,
    pub event_link: String,
}

/// Body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorResponse {
        error: message.to_string(),
    };
    (status, Json(body)).into_response()
}

impl IntoResponse for SubmissionOutcome {
    fn into_response(self) -> Response {
        match self {
            SubmissionOutcome::Created {
                event_id,
                event_link,
            } => {
                let body = CreatedResponse {
                    ok: true,
                    event_id,
                    event_link,
                };
                (StatusCode::CREATED, Json(body)).into_response()
            }
            SubmissionOutcome::ValidationFailed { reason } => {
                error_response(StatusCode::BAD_REQUEST, &reason.to_string())
            }
            SubmissionOutcome::ConfigurationMissing => {
                error_response(StatusCode::INTERNAL_SERVER_ERROR, NOT_CONFIGURED_MESSAGE)
            }
            SubmissionOutcome::RemoteFailure => {
                error_response(StatusCode::BAD_GATEWAY, REMOTE_FAILURE_MESSAGE)
            }
        }
    }
}

/// Handler for appointment booking
pub async fn create_appointment_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        // Bodies sent without a JSON content type are read as an empty payload
        Err(JsonRejection::MissingJsonContentType(rejection)) => {
            debug!("Ignoring appointment body: {}", rejection.body_text());
            Value::Object(Default::default())
        }
        Err(rejection) => {
            debug!("Rejected appointment body: {}", rejection.body_text());
            return error_response(StatusCode::BAD_REQUEST, INVALID_JSON_MESSAGE);
        }
    };

    let request = RawAppointmentRequest::from(payload);
    state.booking.book(&request).await.into_response()
}

/// Handler for health checks
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
