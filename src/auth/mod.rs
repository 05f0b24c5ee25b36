//! Sign-in: identity token decoding, session state, and the auth gate.

pub mod error;
pub mod gate;
pub mod provider;
pub mod session;
pub mod token;

pub use error::{AuthError, Result};
pub use gate::AuthGate;
pub use provider::{generate_nonce, IdentityProvider};
pub use session::{SessionStore, User};
pub use token::{decode_claims, IdentityClaims};
