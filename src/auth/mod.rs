//! Identity gate.
//!
//! Handlers never talk to the identity provider directly; they receive an
//! [`Identity`] through a verifier injected as a capability. The production
//! adapter lives in [`jwks`]; tests plug in their own implementation.

pub mod jwks;

use async_trait::async_trait;
use thiserror::Error;

pub use jwks::JwksVerifier;

/// The authenticated caller as attested by the identity provider.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Stable unique identifier for the identity.
    pub subject: String,
    /// Human-readable name; resource ownership is recorded against this.
    pub display_name: String,
}

#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("Invalid token: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Key set fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token missing key id")]
    MissingKeyId,

    #[error("No key matches the token's key id")]
    UnknownKey,

    #[error("Unsupported signing algorithm")]
    UnsupportedAlgorithm,

    #[error("Key set fetches are rate limited")]
    RateLimited,
}

/// Pluggable bearer-token verification.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}
