//! Auth endpoint rate limit setting.
//!
//! The value is validated and carried in the application state so that a
//! fronting proxy or a later middleware can read it. No limiter runs inside
//! this service.

use std::env;

use crate::{ConfigError, bounded, parse_or};

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Allowed auth requests per minute per client.
    pub auth_rate_limit: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth_rate_limit: 60,
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let limit = parse_or(&lookup, "AUTH_RATE_LIMIT", 60)?;
        Ok(Self {
            auth_rate_limit: bounded("AUTH_RATE_LIMIT", limit, 1..=1000)? as u32,
        })
    }
}
