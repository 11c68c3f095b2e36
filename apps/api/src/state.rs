use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::google::IdentityVerifier;
use crate::auth::session::SessionSigner;
use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Google ID-token verification. Trait object so tests can substitute a fake.
    pub identity: Arc<dyn IdentityVerifier>,
    pub sessions: SessionSigner,
    pub config: Config,
}
