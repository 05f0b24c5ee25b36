//! Error types for sign-in.

/// Result type alias using [`AuthError`].
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors raised while turning an identity assertion into a session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The credential is not a decodable JWT.
    #[error("Malformed identity token: {0}")]
    MalformedToken(String),

    /// The token decoded but lacks a required claim.
    #[error("Identity token is missing the `{0}` claim")]
    MissingClaim(&'static str),

    /// The identity provider reported a failure.
    #[error("Sign-in failed: {0}")]
    Provider(String),

    /// No OAuth client id is configured.
    #[error("No OAuth client id configured - set auth.client_id or auth.credentials_file")]
    MissingClientId,

    /// Reading the client credentials file failed.
    #[error("Could not read client credentials: {0}")]
    Credentials(String),
}

impl AuthError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        AuthError::MalformedToken(msg.into())
    }

    /// Whether re-trying with a fresh token from the provider could help.
    pub fn is_token_error(&self) -> bool {
        matches!(self, AuthError::MalformedToken(_) | AuthError::MissingClaim(_))
    }
}
