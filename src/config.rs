use std::str::FromStr;

use anyhow::{Context, Result};

// ---------------------------------------------------------------------------
// AppEnv
// ---------------------------------------------------------------------------

/// Deployment environment. Development-like environments expose persistence
/// error detail in HTTP responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Test,
    Production,
}

impl AppEnv {
    pub fn exposes_error_details(self) -> bool {
        matches!(self, Self::Development | Self::Test)
    }
}

impl FromStr for AppEnv {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(anyhow::anyhow!("unknown app environment: {other:?}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub server_host: String,
    /// First port tried; later attempts move to the next port up.
    pub server_port: u16,
    /// Upper bound on listen attempts when the port is already taken.
    pub bind_attempts: u32,
    pub app_env: AppEnv,
    /// Hard cap on `?limit=` for reading listings.
    pub max_list_limit: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).with_context(|| format!("missing required env var: {key}"))
        };
        let optional = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            db_max_connections: optional("DB_MAX_CONNECTIONS", "10")
                .parse()
                .context("DB_MAX_CONNECTIONS must be a positive integer")?,
            server_host: optional("SERVER_HOST", "0.0.0.0"),
            server_port: optional("SERVER_PORT", "5000")
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            bind_attempts: positive(&optional("BIND_ATTEMPTS", "5"))
                .context("BIND_ATTEMPTS must be a positive integer")?,
            app_env: optional("APP_ENV", "production")
                .parse()
                .context("APP_ENV must be one of development, test, production")?,
            max_list_limit: positive(&optional("MAX_LIST_LIMIT", "1000"))
                .context("MAX_LIST_LIMIT must be a positive integer")?,
        })
    }
}

fn positive(raw: &str) -> Result<u32> {
    let n: u32 = raw.trim().parse()?;
    anyhow::ensure!(n >= 1, "must be at least 1, got {n}");
    Ok(n)
}
