//! Google identity provider settings.
//!
//! The client never runs the OAuth protocol itself. It only needs the client
//! id to build the sign-in URL; the browser flow ends with an ID token that
//! the user hands to the [`AuthGate`](super::gate::AuthGate).

use std::path::Path;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use serde::Deserialize;
use url::form_urlencoded;

use super::error::{AuthError, Result};
use crate::config::AuthConfig;

/// Google's OAuth 2.0 authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Scopes needed for an ID token carrying name and email.
pub const SCOPES: &str = "openid email profile";

/// Identity provider configuration resolved from [`AuthConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProvider {
    pub client_id: String,
    pub redirect_uri: String,
}

/// Shape of a Google console `credentials.json`.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(alias = "installed")]
    web: ClientSection,
}

#[derive(Debug, Deserialize)]
struct ClientSection {
    client_id: String,
}

impl IdentityProvider {
    /// Resolve the client id: the explicit setting wins over the credentials file.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let client_id = match (&config.client_id, &config.credentials_file) {
            (Some(id), _) if !id.trim().is_empty() => id.trim().to_string(),
            (_, Some(path)) => read_client_id(path)?,
            _ => return Err(AuthError::MissingClientId),
        };

        Ok(Self {
            client_id,
            redirect_uri: config.redirect_uri.clone(),
        })
    }

    /// Build the URL the user opens to obtain an ID token.
    pub fn sign_in_url(&self, nonce: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("response_type", "id_token")
            .append_pair("scope", SCOPES)
            .append_pair("nonce", nonce)
            .append_pair("prompt", "select_account")
            .finish();
        format!("{GOOGLE_AUTH_URL}?{query}")
    }
}

fn read_client_id(path: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AuthError::Credentials(format!("{}: {e}", path.display())))?;
    let parsed: CredentialsFile = serde_json::from_str(&contents)
        .map_err(|e| AuthError::Credentials(format!("{}: {e}", path.display())))?;
    if parsed.web.client_id.trim().is_empty() {
        return Err(AuthError::MissingClientId);
    }
    Ok(parsed.web.client_id)
}

/// Random nonce for the sign-in request (16 bytes, base64url).
#[must_use]
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
