use std::env;
use std::str::FromStr;

use crate::{ConfigError, bounded, parse_or};

/// Output format of the console log layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "SERVER_PORT", 8888)?;
        let port = bounded("SERVER_PORT", port, 1..=65_535)? as u16;

        let log_level = lookup("LOG_LEVEL")
            .map(|l| l.to_lowercase())
            .unwrap_or_else(|| "info".to_string());
        if !matches!(log_level.as_str(), "debug" | "info" | "warn" | "error") {
            return Err(ConfigError::Invalid {
                key: "LOG_LEVEL",
                value: log_level,
            });
        }

        Ok(Self {
            host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            log_level,
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Text)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
