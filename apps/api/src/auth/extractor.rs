//! Axum extractor that authenticates requests via the session JWT.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

/// The authenticated user, extracted from the `Authorization: Bearer` header.
/// Rejects missing/invalid tokens and inactive accounts.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let claims = state.sessions.verify(token)?;

        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE google_id = $1")
            .bind(&claims.sub)
            .fetch_optional(&state.db)
            .await?;

        let user =
            user.ok_or_else(|| AppError::Unauthorized("Unknown user".to_string()))?;

        if !user.is_active {
            return Err(AppError::Forbidden);
        }

        Ok(CurrentUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[test]
    fn test_bearer_token_extraction() {
        let (parts, _) = Request::builder()
            .header("authorization", "Bearer abc.def.ghi")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert_eq!(bearer_token(&parts), None);
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let (parts, _) = Request::builder()
            .header("authorization", "Basic dXNlcjpwYXNz")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), None);
    }
}
