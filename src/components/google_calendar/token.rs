use crate::config::ServiceAccountCredential;
use crate::error::{google_calendar_error, BookingResult};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const CALENDAR_EVENTS_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens this close to expiry are refreshed
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

#[derive(Debug, Clone)]
struct CachedToken {
    client_email: String,
    access_token: String,
    expires_at: i64,
}

impl CachedToken {
    fn is_usable_for(&self, client_email: &str, now: i64) -> bool {
        self.client_email == client_email && self.expires_at - EXPIRY_MARGIN_SECS > now
    }
}

/// Obtains and caches service account access tokens
#[derive(Clone)]
pub struct TokenManager {
    client: Client,
    token_url: String,
    cache: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenManager {
    pub fn new(client: Client) -> Self {
        Self::with_token_url(client, GOOGLE_TOKEN_URL)
    }

    pub fn with_token_url(client: Client, token_url: &str) -> Self {
        Self {
            client,
            token_url: token_url.to_string(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Get an access token, reusing the cached one while it is valid
    pub async fn get_token(&self, credential: &ServiceAccountCredential) -> BookingResult<String> {
        let now = Utc::now().timestamp();

        {
            let cache = self.cache.read().await;
            if let Some(token) = &*cache {
                if token.is_usable_for(&credential.client_email, now) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let token = self.request_token(credential, now).await?;
        let access_token = token.access_token.clone();
        *self.cache.write().await = Some(token);

        Ok(access_token)
    }

    /// Exchange a signed assertion for a new access token
    async fn request_token(
        &self,
        credential: &ServiceAccountCredential,
        now: i64,
    ) -> BookingResult<CachedToken> {
        debug!("Requesting access token for {}", credential.client_email);

        let assertion = sign_assertion(credential, now)?;
        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to request token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(google_calendar_error(&format!(
                "Failed to request token: HTTP {} - {}",
                status, error_body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| google_calendar_error(&format!("Failed to parse token response: {}", e)))?;

        Ok(CachedToken {
            client_email: credential.client_email.clone(),
            access_token: token.access_token,
            expires_at: now + token.expires_in,
        })
    }
}

/// Build the RS256 signed JWT used in the token exchange
fn sign_assertion(credential: &ServiceAccountCredential, now: i64) -> BookingResult<String> {
    let claims = AssertionClaims {
        iss: &credential.client_email,
        scope: CALENDAR_EVENTS_SCOPE,
        aud: GOOGLE_TOKEN_URL,
        iat: now,
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let key = EncodingKey::from_rsa_pem(credential.private_key.as_bytes())
        .map_err(|e| google_calendar_error(&format!("Invalid service account private key: {}", e)))?;

    encode(&Header::new(Algorithm::RS256), &claims, &key)
        .map_err(|e| google_calendar_error(&format!("Failed to sign token assertion: {}", e)))
}
