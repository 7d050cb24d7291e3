use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::auth::TokenVerifier;
use crate::error::AppError;

/// The verified caller, extracted from the `Authorization: Bearer` header.
///
/// The verifier arrives through an `Extension` layer so handlers stay
/// independent of the identity provider. Missing header, malformed header,
/// and failed verification all reject with 401.
#[derive(Clone, Debug)]
pub struct AuthUser {
    /// Stable subject id from the token.
    pub subject: String,
    /// Display name; ownership checks compare against this.
    pub name: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let verifier = parts
            .extensions
            .get::<Arc<dyn TokenVerifier>>()
            .cloned()
            .ok_or_else(|| AppError::Internal("token verifier not configured".to_string()))?;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let identity = verifier.verify(token).await.map_err(|e| {
            tracing::debug!("Token verification failed: {}", e);
            AppError::Unauthorized
        })?;

        Ok(AuthUser {
            subject: identity.subject,
            name: identity.display_name,
        })
    }
}
