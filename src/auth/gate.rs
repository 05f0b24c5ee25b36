//! Auth gate: turns identity-provider outcomes into session state.

use chrono::Utc;
use tracing::{info, warn};

use super::error::{AuthError, Result};
use super::session::{SessionStore, User};
use super::token::decode_claims;

/// Accepts identity assertions and keeps [`SessionStore`] in sync with them.
#[derive(Debug, Clone)]
pub struct AuthGate {
    session: SessionStore,
}

impl AuthGate {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Handle a credential returned by the identity provider.
    ///
    /// On success the session holds the decoded user and the caller is
    /// expected to refresh the document list for `user.subject_id`. On
    /// failure the session is cleared.
    pub fn sign_in(&self, credential: &str) -> Result<User> {
        let claims = match decode_claims(credential) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(error = %e, "rejecting identity token");
                self.session.logout();
                return Err(e);
            }
        };

        if claims.is_expired_at(Utc::now()) {
            // Signature and expiry are the backend's call; just leave a trace.
            warn!(expired_at = ?claims.expires_at(), "identity token is already expired");
        }

        let user = match claims.into_user() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "rejecting identity token");
                self.session.logout();
                return Err(e);
            }
        };

        info!(subject_id = %user.subject_id, "signed in");
        self.session.login(user.clone());
        Ok(user)
    }

    /// Handle a failure reported by the identity provider.
    pub fn fail(&self, reason: &str) -> AuthError {
        warn!(reason, "authentication failed");
        self.session.logout();
        AuthError::Provider(reason.to_string())
    }

    /// End the session.
    pub fn sign_out(&self) -> Option<User> {
        let user = self.session.logout();
        if let Some(ref u) = user {
            info!(subject_id = %u.subject_id, "signed out");
        }
        user
    }
}
