//! Authentication — Google ID-token verification, session JWTs, user upsert.

pub mod extractor;
pub mod google;
pub mod handlers;
pub mod session;

use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::google::GoogleClaims;
use crate::errors::AppError;
use crate::models::user::User;

/// Finds the user for a verified Google identity, creating or linking rows
/// as needed, and stamps `last_login`.
///
/// Lookup order: by `google_id`; then by `email` (account linking — the
/// Google id is attached to the existing row); otherwise a new user is
/// inserted.
pub async fn get_or_create_user(pool: &PgPool, claims: &GoogleClaims) -> Result<User, AppError> {
    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE google_id = $1")
        .bind(&claims.sub)
        .fetch_optional(pool)
        .await?;

    let user = match existing {
        Some(user) => user,
        None => {
            let by_email: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
                .bind(&claims.email)
                .fetch_optional(pool)
                .await?;

            match by_email {
                Some(user) => {
                    info!("Linking Google account to existing user {}", user.id);
                    sqlx::query("UPDATE users SET google_id = $1, updated_at = now() WHERE id = $2")
                        .bind(&claims.sub)
                        .bind(user.id)
                        .execute(pool)
                        .await?;
                    user
                }
                None => {
                    let id = Uuid::new_v4();
                    info!("Creating new user {} for {}", id, claims.email);
                    sqlx::query_as(
                        r#"
                        INSERT INTO users
                            (id, google_id, email, name, given_name, family_name, picture, is_active)
                        VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE)
                        RETURNING *
                        "#,
                    )
                    .bind(id)
                    .bind(&claims.sub)
                    .bind(&claims.email)
                    .bind(claims.name.clone().unwrap_or_default())
                    .bind(&claims.given_name)
                    .bind(&claims.family_name)
                    .bind(&claims.picture)
                    .fetch_one(pool)
                    .await?
                }
            }
        }
    };

    let user: User = sqlx::query_as(
        "UPDATE users SET last_login = $1, updated_at = now() WHERE id = $2 RETURNING *",
    )
    .bind(Utc::now())
    .bind(user.id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}
