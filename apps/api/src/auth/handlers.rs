//! Axum route handlers for authentication.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::extractor::CurrentUser;
use crate::auth::get_or_create_user;
use crate::auth::google::IdentityVerifier;
use crate::errors::AppError;
use crate::models::user::{User, UserProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Google ID token obtained by the frontend sign-in flow.
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn token_response(state: &AppState, user: User) -> Result<TokenResponse, AppError> {
    let access_token = state.sessions.issue(&user)?;
    Ok(TokenResponse {
        access_token,
        token_type: "bearer",
        expires_in: state.sessions.expires_in_secs(),
        user: user.into(),
    })
}

/// POST /api/auth/login
///
/// Verifies a Google ID token, upserts the user, and issues a session JWT.
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let claims = state.identity.verify(&request.token).await?;
    let user = get_or_create_user(&state.db, &claims).await?;
    Ok(Json(token_response(&state, user)?))
}

/// POST /api/auth/refresh
///
/// Issues a fresh session JWT for an already-authenticated user.
pub async fn handle_refresh(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<TokenResponse>, AppError> {
    sqlx::query("UPDATE users SET last_login = $1, updated_at = now() WHERE id = $2")
        .bind(Utc::now())
        .bind(user.id)
        .execute(&state.db)
        .await?;

    Ok(Json(token_response(&state, user)?))
}

/// GET /api/auth/me
pub async fn handle_me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.into())
}

/// POST /api/auth/logout
///
/// Stateless: the client discards its token.
pub async fn handle_logout(CurrentUser(_user): CurrentUser) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Successfully logged out".to_string(),
    })
}
