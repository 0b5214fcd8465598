use crate::config::CredentialSource;
use crate::error::{credentials_error, BridgeResult};
use serde::Deserialize;
use std::fs;

/// Google's OAuth token endpoint, used when the key file does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Service account key as downloaded from the Google Cloud console
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

// Keeps the private key out of logs
impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parse a key from its JSON text
    pub fn from_json(json: &str) -> BridgeResult<Self> {
        let key: ServiceAccountKey = serde_json::from_str(json)
            .map_err(|e| credentials_error(&format!("Invalid service account JSON: {}", e)))?;

        if key.client_email.trim().is_empty() {
            return Err(credentials_error("Service account JSON has an empty client_email"));
        }
        if !key.private_key.contains("PRIVATE KEY") {
            return Err(credentials_error("Service account JSON has no PEM private_key"));
        }

        Ok(key)
    }
}

/// Credentials resolved from configuration
#[derive(Debug, Clone)]
pub enum Credentials {
    ServiceAccount(ServiceAccountKey),
    AccessToken(String),
}

impl Credentials {
    /// Resolve the configured credential source
    pub fn load(source: &CredentialSource) -> BridgeResult<Self> {
        match source {
            CredentialSource::Inline(json) => {
                ServiceAccountKey::from_json(json).map(Credentials::ServiceAccount)
            }
            CredentialSource::File(path) => {
                let json = fs::read_to_string(path).map_err(|e| {
                    credentials_error(&format!("Failed to read {}: {}", path.display(), e))
                })?;
                ServiceAccountKey::from_json(&json).map(Credentials::ServiceAccount)
            }
            CredentialSource::AccessToken(token) => Ok(Credentials::AccessToken(token.clone())),
            CredentialSource::Missing => Err(credentials_error("No Google credentials configured")),
        }
    }
}
