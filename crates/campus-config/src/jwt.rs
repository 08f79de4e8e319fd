use std::env;
use std::fmt;

use crate::{ConfigError, bounded, parse_or};

/// Shortest and longest token lifetime accepted, in seconds.
pub const TTL_BOUNDS: std::ops::RangeInclusive<i64> = 1..=86_400;

/// Token signing configuration.
///
/// The secret is required and must never reach a log line, so `Debug` is
/// implemented by hand and redacts it.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let access = parse_or(&lookup, "JWT_ACCESS_EXPIRY", 900)?; // 15 minutes
        let refresh = parse_or(&lookup, "JWT_REFRESH_EXPIRY", 86_400)?; // 1 day

        Ok(Self {
            secret,
            access_token_expiry: bounded("JWT_ACCESS_EXPIRY", access, TTL_BOUNDS)?,
            refresh_token_expiry: bounded("JWT_REFRESH_EXPIRY", refresh, TTL_BOUNDS)?,
        })
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[redacted]")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .finish()
    }
}
