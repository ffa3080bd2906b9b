//! Service-account authentication for the Drive API.
//!
//! Signs an RS256 JWT assertion with the service-account private key and
//! exchanges it for a bearer token at the key's token URI.

use crate::error::ApiError;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Full read/write Drive scope; description updates need write access.
pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Tokens are refreshed this many seconds before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Service-account credential as issued by the cloud console.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub private_key_id: Option<String>,
    pub private_key: String,
    pub client_email: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Check required fields before any network use.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.client_email.trim().is_empty() {
            return Err(ApiError::Validation(
                "service account client_email is empty".to_string(),
            ));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(ApiError::Validation(
                "service account private_key is not a PEM private key".to_string(),
            ));
        }
        if let Some(kind) = &self.key_type {
            if kind != "service_account" {
                return Err(ApiError::Validation(format!(
                    "credential type must be service_account, got {}",
                    kind
                )));
            }
        }
        Ok(())
    }
}

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
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: i64,
}

/// Token source backed by a service-account key.
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    scope: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Result<Self, ApiError> {
        key.validate()?;
        Ok(Self {
            key,
            scope: DRIVE_SCOPE.to_string(),
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Build the signed JWT assertion for the token exchange.
    pub fn signed_assertion(&self, now: i64) -> Result<String, ApiError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };
        let encoding_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| ApiError::Validation(format!("invalid service account key: {}", e)))?;
        jsonwebtoken::encode(&header, &claims, &encoding_key)
            .map_err(|e| ApiError::Validation(format!("failed to sign assertion: {}", e)))
    }

    /// Current bearer token, exchanging a fresh assertion when the cached one is stale.
    pub async fn access_token(&self, client: &reqwest::Client) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        if let Some(token) = self.cached.lock().as_ref() {
            if token.expires_at - EXPIRY_MARGIN_SECS > now {
                return Ok(token.value.clone());
            }
        }

        let assertion = self.signed_assertion(now)?;
        let response = client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Transport(format!(
                "token exchange rejected ({}): {}",
                status, text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Transport(format!("token response unreadable: {}", e)))?;
        let expires_at = now + token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        debug!(client_email = %self.key.client_email, expires_at, "Obtained access token");

        *self.cached.lock() = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at,
        });
        Ok(token.access_token)
    }
}
