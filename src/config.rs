use std::{fmt::Display, path::PathBuf, str::FromStr};

use anyhow::Context;
use serde::Deserialize;

/// Longest accepted session inactivity window: one year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;
/// Signed cookies need a 64-byte master key.
pub const MIN_SECRET_LEN: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_minutes: i64,
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub model_path: PathBuf,
    pub history_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://database.db?mode=rwc".into());
        let session = SessionConfig {
            secret: std::env::var("SECRET_KEY").context("SECRET_KEY must be set")?,
            ttl_minutes: parse_or("SESSION_TTL_MINUTES", 60 * 24)?,
            secure_cookie: parse_or("SESSION_SECURE_COOKIE", false)?,
        };
        let model_path = std::env::var("MODEL_PATH")
            .unwrap_or_else(|_| "model/diabetes_model.json".into())
            .into();
        let history_limit = parse_or("HISTORY_LIMIT", 10)?;
        let config = Self {
            database_url,
            session,
            model_path,
            history_limit,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_SESSION_TTL_MINUTES).contains(&self.session.ttl_minutes),
            "SESSION_TTL_MINUTES must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {}",
            self.session.ttl_minutes
        );
        anyhow::ensure!(
            self.session.secret.len() >= MIN_SECRET_LEN,
            "SECRET_KEY must be at least {MIN_SECRET_LEN} bytes"
        );
        anyhow::ensure!(self.history_limit >= 1, "HISTORY_LIMIT must be at least 1");
        Ok(())
    }
}

/// Reads `key` from the environment, falling back to `default` when unset.
/// A value that is present but unparsable is an error.
fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid {key} value {raw:?}: {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        AppConfig {
            database_url: "sqlite::memory:".into(),
            session: SessionConfig {
                secret: "k".repeat(MIN_SECRET_LEN),
                ttl_minutes: 60,
                secure_cookie: false,
            },
            model_path: "model/diabetes_model.json".into(),
            history_limit: 10,
        }
    }

    #[test]
    fn accepts_sane_values() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_session_ttl() {
        for ttl in [0, -5, MAX_SESSION_TTL_MINUTES + 1, 1_000_000_000_000] {
            let mut cfg = valid();
            cfg.session.ttl_minutes = ttl;
            let err = cfg.validate().unwrap_err();
            assert!(err.to_string().contains("SESSION_TTL_MINUTES"), "{ttl}");
        }
    }

    #[test]
    fn accepts_ttl_bounds() {
        let mut cfg = valid();
        cfg.session.ttl_minutes = MAX_SESSION_TTL_MINUTES;
        assert!(cfg.validate().is_ok());
        cfg.session.ttl_minutes = 1;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_short_secret() {
        let mut cfg = valid();
        cfg.session.secret = "short".into();
        assert!(cfg.validate().unwrap_err().to_string().contains("SECRET_KEY"));
    }

    #[test]
    fn rejects_zero_history_limit() {
        let mut cfg = valid();
        cfg.history_limit = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn parse_or_falls_back_when_unset() {
        let v: i64 = parse_or("DIABETES_RISK_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(v, 42);
    }

    #[test]
    fn parse_or_rejects_garbage() {
        std::env::set_var("DIABETES_RISK_TEST_BAD_NUMBER", "ten");
        let err = parse_or::<usize>("DIABETES_RISK_TEST_BAD_NUMBER", 10).unwrap_err();
        assert!(err.to_string().contains("DIABETES_RISK_TEST_BAD_NUMBER"));
    }

    #[test]
    fn parse_or_reads_value() {
        std::env::set_var("DIABETES_RISK_TEST_GOOD_NUMBER", " 25 ");
        let v: usize = parse_or("DIABETES_RISK_TEST_GOOD_NUMBER", 10).unwrap();
        assert_eq!(v, 25);
    }
}
