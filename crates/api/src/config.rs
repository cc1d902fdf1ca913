//! Process configuration, read once from the environment at startup.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3004;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://fleet.db";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),

    #[error("BIND_ADDR must be an IP address, got '{0}'")]
    InvalidBindAddr(String),

    #[error("{name} must be 'true' or 'false', got '{value}'")]
    InvalidBool { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub database_url: String,
    /// Insert the bootstrap read/write users on startup.
    pub seed_users: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            seed_users: true,
        }
    }
}

impl ApiConfig {
    /// `PORT`, `BIND_ADDR`, `DATABASE_URL`, `SEED_USERS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr(addr.clone()))?;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            config.database_url = url;
        }
        if let Some(seed) = lookup("SEED_USERS") {
            config.seed_users = parse_bool("SEED_USERS", &seed)?;
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = from(&[]).unwrap();
        assert_eq!(config.port, 3004);
        assert_eq!(config.database_url, "sqlite://fleet.db");
        assert!(config.seed_users);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3004");
    }

    #[test]
    fn overrides_are_applied() {
        let config = from(&[
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("SEED_USERS", "false"),
        ])
        .unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(!config.seed_users);
    }

    #[test]
    fn invalid_values_are_errors() {
        assert_eq!(from(&[("PORT", "abc")]), Err(ConfigError::InvalidPort("abc".into())));
        assert!(matches!(from(&[("BIND_ADDR", "host")]), Err(ConfigError::InvalidBindAddr(_))));
        assert!(matches!(from(&[("SEED_USERS", "maybe")]), Err(ConfigError::InvalidBool { .. })));
    }
}
