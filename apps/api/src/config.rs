use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub google_client_id: String,
    pub jwt_secret: String,
    pub openai_api_key: String,
    pub upload_dir: String,
    pub allowed_origins: Vec<String>,
    pub token_expire_minutes: i64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            google_client_id: require_env("GOOGLE_CLIENT_ID")?,
            jwt_secret: require_env("JWT_SECRET")?,
            openai_api_key: require_env("OPENAI_API_KEY")?,
            upload_dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            allowed_origins: parse_origins(
                &std::env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            ),
            token_expire_minutes: std::env::var("TOKEN_EXPIRE_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<i64>()
                .context("TOKEN_EXPIRE_MINUTES must be an integer")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_trims_and_drops_empties() {
        let origins = parse_origins("http://localhost:3000, https://app.example.edu ,");
        assert_eq!(
            origins,
            vec!["http://localhost:3000", "https://app.example.edu"]
        );
    }

    #[test]
    fn test_parse_origins_single() {
        assert_eq!(parse_origins("http://localhost:3000"), vec![
            "http://localhost:3000"
        ]);
    }
}
