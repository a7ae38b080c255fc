use anyhow::{Context, Result, anyhow};
use axum_extra::extract::cookie::Key;
use base64::{Engine as _, engine::general_purpose::STANDARD};

const DEFAULT_SESSION_TTL_DAYS: i64 = 7;
const MIN_SECRET_BYTES: usize = 64;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub cookie_key: Key,
    pub cors_allowed_origins: Vec<String>,
    pub session_ttl_days: i64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let cookie_secret =
            std::env::var("COOKIE_SECRET_BASE64").context("COOKIE_SECRET_BASE64 missing")?;
        let cookie_key = decode_cookie_key(&cookie_secret)?;

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let session_ttl_days = match std::env::var("SESSION_TTL_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| *days > 0)
                .ok_or_else(|| anyhow!("SESSION_TTL_DAYS must be a positive integer"))?,
            Err(_) => DEFAULT_SESSION_TTL_DAYS,
        };

        Ok(Self {
            cookie_key,
            cors_allowed_origins,
            session_ttl_days,
        })
    }

    /// Throwaway key and permissive CORS for local runs and tests.
    pub fn ephemeral() -> Self {
        Self {
            cookie_key: Key::generate(),
            cors_allowed_origins: Vec::new(),
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
        }
    }
}

fn decode_cookie_key(raw: &str) -> Result<Key> {
    let secret_bytes = STANDARD
        .decode(raw.trim())
        .context("invalid COOKIE_SECRET_BASE64")?;
    if secret_bytes.len() < MIN_SECRET_BYTES {
        return Err(anyhow!(
            "COOKIE_SECRET_BASE64 must decode to at least {MIN_SECRET_BYTES} bytes"
        ));
    }
    Ok(Key::from(&secret_bytes[..MIN_SECRET_BYTES]))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
