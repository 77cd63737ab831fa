use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use mash_api::ApiConfig;

/// Secrets that only exist in sample files and must never reach production.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub api: ApiConfig,
}

impl Config {
    /// Read configuration from the environment (a `.env` file, if loaded,
    /// counts). Malformed numbers are an error rather than a silent default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("MASH_JWT_SECRET").unwrap_or_else(|| "dev-secret-change-me".into());
        if jwt_secret.trim().is_empty() {
            bail!("MASH_JWT_SECRET is empty; set it in your .env file and restart");
        }
        if PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            warn!("MASH_JWT_SECRET is unset or still a placeholder; tokens are forgeable");
        }

        let store_timeout_ms: u64 = parse_or(&lookup, "MASH_STORE_TIMEOUT_MS", 5_000)?;
        let cooldown_secs: u64 = parse_or(&lookup, "MASH_VOTE_COOLDOWN_SECS", 0)?;
        let vote_cooldown = i64::try_from(cooldown_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .with_context(|| format!("MASH_VOTE_COOLDOWN_SECS {cooldown_secs} is out of range"))?;

        Ok(Self {
            host: lookup("MASH_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, "MASH_PORT", 3000)?,
            db_path: lookup("MASH_DB_PATH").unwrap_or_else(|| "mash.db".into()).into(),
            api: ApiConfig {
                jwt_secret,
                fallback_avatar: lookup("MASH_FALLBACK_AVATAR")
                    .unwrap_or_else(|| "/fallbackAvatar.png".into()),
                store_timeout: Duration::from_millis(store_timeout_ms),
                vote_cooldown,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key} value '{raw}'")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
