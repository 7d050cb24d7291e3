//! JWKS-backed RS256 token verification.
//!
//! Signing keys come from the identity provider's published key set. The
//! set is cached after the first fetch and refreshed only when a token
//! arrives with an unknown key id, with fetches capped at
//! [`JWKS_FETCHES_PER_MINUTE`].

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use super::{Identity, TokenVerifier, VerifyError};
use crate::config::AuthConfig;

const JWKS_FETCHES_PER_MINUTE: usize = 5;
const RATE_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: Option<String>,
    kty: String,
    /// RSA modulus, base64url.
    n: Option<String>,
    /// RSA exponent, base64url.
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    name: Option<String>,
}

pub struct JwksVerifier {
    jwks_uri: String,
    issuer: String,
    http: Client,
    cached_keys: RwLock<Option<HashMap<String, Jwk>>>,
    fetch_times: Mutex<VecDeque<Instant>>,
}

impl JwksVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            jwks_uri: config.jwks_uri.clone(),
            issuer: config.issuer.clone(),
            http: Client::new(),
            cached_keys: RwLock::new(None),
            fetch_times: Mutex::new(VecDeque::new()),
        }
    }

    async fn key_for(&self, kid: &str) -> Result<Jwk, VerifyError> {
        if let Some(keys) = self.cached_keys.read().await.as_ref() {
            if let Some(key) = keys.get(kid) {
                return Ok(key.clone());
            }
        }

        self.refresh_keys().await?;

        self.cached_keys
            .read()
            .await
            .as_ref()
            .and_then(|keys| keys.get(kid).cloned())
            .ok_or(VerifyError::UnknownKey)
    }

    async fn refresh_keys(&self) -> Result<(), VerifyError> {
        self.reserve_fetch().await?;

        tracing::debug!("Fetching JWKS from {}", self.jwks_uri);
        let set: JwkSet = self
            .http
            .get(&self.jwks_uri)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let keys: HashMap<String, Jwk> = set
            .keys
            .into_iter()
            .filter(|k| k.kty == "RSA")
            .filter_map(|k| k.kid.clone().map(|kid| (kid, k)))
            .collect();

        tracing::debug!("Cached {} signing keys", keys.len());
        *self.cached_keys.write().await = Some(keys);
        Ok(())
    }

    /// Record a fetch against the sliding window, refusing once the cap is
    /// reached.
    async fn reserve_fetch(&self) -> Result<(), VerifyError> {
        let mut times = self.fetch_times.lock().await;
        let now = Instant::now();
        while let Some(&front) = times.front() {
            if now.duration_since(front) >= RATE_WINDOW {
                times.pop_front();
            } else {
                break;
            }
        }
        if times.len() >= JWKS_FETCHES_PER_MINUTE {
            tracing::warn!("JWKS fetch rate limit hit");
            return Err(VerifyError::RateLimited);
        }
        times.push_back(now);
        Ok(())
    }
}

#[async_trait]
impl TokenVerifier for JwksVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let header = decode_header(token)?;
        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::UnsupportedAlgorithm);
        }
        let kid = header.kid.ok_or(VerifyError::MissingKeyId)?;

        let jwk = self.key_for(&kid).await?;
        let (n, e) = match (&jwk.n, &jwk.e) {
            (Some(n), Some(e)) => (n, e),
            _ => return Err(VerifyError::UnknownKey),
        };
        let key = DecodingKey::from_rsa_components(n, e)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        // The original middleware pinned issuer and algorithm only.
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &key, &validation)?;

        let subject = data.claims.sub;
        let display_name = data.claims.name.unwrap_or_else(|| subject.clone());
        Ok(Identity {
            subject,
            display_name,
        })
    }
}
