//! Google ID-token verification against Google's published JWKS.
//!
//! Verification is delegated entirely to `jsonwebtoken`: RS256 signature,
//! audience = our OAuth client id, issuer = accounts.google.com. The JWKS is
//! fetched over HTTPS and cached for an hour.

use async_trait::async_trait;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::AppError;

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Claims we consume from a verified Google ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleClaims {
    /// Google's stable account id.
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
}

/// Seam for identity verification so handlers can be tested without
/// talking to Google.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims, AppError>;
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
}

struct CachedKeys {
    fetched_at: Instant,
    keys: Vec<Jwk>,
}

/// Production verifier backed by Google's JWKS endpoint.
pub struct GoogleVerifier {
    http: Client,
    client_id: String,
    cache: RwLock<Option<CachedKeys>>,
}

impl GoogleVerifier {
    pub fn new(client_id: String) -> Self {
        Self {
            http: Client::new(),
            client_id,
            cache: RwLock::new(None),
        }
    }

    async fn key_for(&self, kid: &str) -> Result<Jwk, AppError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < JWKS_CACHE_TTL {
                    if let Some(jwk) = cached.keys.iter().find(|k| k.kid == kid) {
                        return Ok(jwk.clone());
                    }
                }
            }
        }

        // Cache miss or key rotation: refetch.
        debug!("Fetching Google JWKS");
        let jwks: JwkSet = self
            .http
            .get(GOOGLE_JWKS_URL)
            .send()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Failed to fetch Google keys: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Invalid Google JWKS: {e}")))?;

        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeys {
            fetched_at: Instant::now(),
            keys: jwks.keys.clone(),
        });

        jwks.keys
            .into_iter()
            .find(|k| k.kid == kid)
            .ok_or_else(|| AppError::Unauthorized("Unknown Google signing key".to_string()))
    }
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleClaims, AppError> {
        let header = decode_header(id_token)
            .map_err(|e| AppError::Unauthorized(format!("Invalid Google token: {e}")))?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::Unauthorized("Google token missing key id".to_string()))?;

        let jwk = self.key_for(&kid).await?;
        let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
            .map_err(|e| AppError::Unauthorized(format!("Invalid Google signing key: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.client_id]);
        validation.set_issuer(&GOOGLE_ISSUERS);

        let data = decode::<GoogleClaims>(id_token, &key, &validation)
            .map_err(|e| AppError::Unauthorized(format!("Invalid Google token: {e}")))?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_claims_deserialize_minimal() {
        // Google omits profile fields when scopes are narrow.
        let raw = r#"{"sub": "108", "email": "student@example.edu"}"#;
        let claims: GoogleClaims = serde_json::from_str(raw).unwrap();
        assert_eq!(claims.sub, "108");
        assert_eq!(claims.email, "student@example.edu");
        assert!(claims.name.is_none());
    }

    #[test]
    fn test_jwk_set_deserialize() {
        let raw = r#"{"keys": [{"kid": "abc", "n": "mod", "e": "AQAB", "kty": "RSA"}]}"#;
        let jwks: JwkSet = serde_json::from_str(raw).unwrap();
        assert_eq!(jwks.keys.len(), 1);
        assert_eq!(jwks.keys[0].kid, "abc");
    }
}
