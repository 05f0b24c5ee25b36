//! Local decoding of identity tokens.
//!
//! The token's signature is NOT verified here. The backend is expected to
//! verify it on the calls that carry it; the client only needs the claims to
//! know who is signed in.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use super::error::{AuthError, Result};
use super::session::User;

/// Claims the client reads from a Google identity token.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

impl IdentityClaims {
    /// Expiry time, if the token carries one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    /// Build the session user. `sub` is required; name and email default to "".
    pub fn into_user(self) -> Result<User> {
        let subject_id = self
            .sub
            .filter(|s| !s.trim().is_empty())
            .ok_or(AuthError::MissingClaim("sub"))?;
        Ok(User {
            subject_id,
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
        })
    }
}

/// Decode the payload segment of a JWT.
pub fn decode_claims(token: &str) -> Result<IdentityClaims> {
    let token = token.trim();
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next()) {
        (Some(header), Some(payload)) if !header.is_empty() && !payload.is_empty() => payload,
        _ => return Err(AuthError::malformed("expected header.payload.signature")),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::malformed(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::malformed(format!("payload is not a JSON object: {e}")))
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.c2lnbmF0dXJl")
}
