use super::credentials::ServiceAccountKey;
use crate::error::{credentials_error, google_calendar_error, BridgeResult};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// OAuth scope requested for the calendar handle
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Tokens are refreshed this many seconds before they expire
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Lifetime requested for the signed assertion
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Source of bearer tokens for the calendar API
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get a currently valid access token
    async fn access_token(&self) -> BridgeResult<String>;
}

/// A fixed, externally issued token
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> BridgeResult<String> {
        Ok(self.0.clone())
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

impl CachedToken {
    fn is_fresh(&self, now: i64) -> bool {
        self.expires_at - EXPIRY_MARGIN_SECS > now
    }
}

/// Exchanges signed service account assertions for access tokens and caches them
pub struct ServiceAccountTokenManager {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    subject: Option<String>,
    client: Client,
    cached: RwLock<Option<CachedToken>>,
}

impl ServiceAccountTokenManager {
    /// Create a token manager, validating the private key up front
    pub fn new(key: ServiceAccountKey, subject: Option<String>, client: Client) -> BridgeResult<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| credentials_error(&format!("Invalid service account private key: {}", e)))?;

        Ok(Self {
            key,
            encoding_key,
            subject,
            client,
            cached: RwLock::new(None),
        })
    }

    /// Service account identity
    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    fn signed_assertion(&self, now: i64) -> BridgeResult<String> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        let claims = Claims {
            iss: &self.key.client_email,
            scope: CALENDAR_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
            sub: self.subject.as_deref(),
        };

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| credentials_error(&format!("Failed to sign assertion: {}", e)))
    }

    async fn fetch_token(&self) -> BridgeResult<CachedToken> {
        let now = Utc::now().timestamp();
        let assertion = self.signed_assertion(now)?;

        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .client
            .post(&self.key.token_uri)
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

        let expires_in = token.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS);
        info!(client_email = %self.key.client_email, expires_in, "Obtained calendar access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: now + expires_in,
        })
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountTokenManager {
    async fn access_token(&self) -> BridgeResult<String> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref() {
                if token.is_fresh(Utc::now().timestamp()) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let mut cached = self.cached.write().await;
        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now().timestamp()) {
                return Ok(token.access_token.clone());
            }
        }

        debug!("Refreshing calendar access token");
        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}
