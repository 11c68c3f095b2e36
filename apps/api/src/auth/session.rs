//! Session tokens — HS256 JWTs issued after Google login.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The user's google_id.
    pub sub: String,
    pub email: String,
    pub exp: i64,
}

/// Issues and verifies session JWTs. Cheap to clone; lives in `AppState`.
#[derive(Clone)]
pub struct SessionSigner {
    secret: String,
    expire_minutes: i64,
}

impl SessionSigner {
    pub fn new(secret: String, expire_minutes: i64) -> Self {
        Self {
            secret,
            expire_minutes,
        }
    }

    /// Seconds a freshly issued token is valid for.
    pub fn expires_in_secs(&self) -> i64 {
        self.expire_minutes * 60
    }

    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let claims = SessionClaims {
            sub: user.google_id.clone(),
            email: user.email.clone(),
            exp: (Utc::now() + Duration::minutes(self.expire_minutes)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign session token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Unauthorized(format!("Invalid session token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            google_id: "108".to_string(),
            email: "student@example.edu".to_string(),
            name: "Test Student".to_string(),
            given_name: None,
            family_name: None,
            picture: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let signer = SessionSigner::new("test-secret".to_string(), 30);
        let token = signer.issue(&test_user()).unwrap();
        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "108");
        assert_eq!(claims.email, "student@example.edu");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let signer = SessionSigner::new("test-secret".to_string(), 30);
        let other = SessionSigner::new("other-secret".to_string(), 30);
        let token = signer.issue(&test_user()).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        // Negative lifetime puts exp in the past.
        let signer = SessionSigner::new("test-secret".to_string(), -5);
        let token = signer.issue(&test_user()).unwrap();
        assert!(signer.verify(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let signer = SessionSigner::new("test-secret".to_string(), 30);
        assert!(signer.verify("not-a-jwt").is_err());
    }

    #[test]
    fn test_expires_in_secs() {
        let signer = SessionSigner::new("s".to_string(), 30);
        assert_eq!(signer.expires_in_secs(), 1800);
    }
}
