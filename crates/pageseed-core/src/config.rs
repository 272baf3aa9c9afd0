use std::{num::NonZeroUsize, str::FromStr, time::Duration};

use crate::error::{PageseedError, Result};

pub const DEFAULT_TOTAL: u64 = 1_000_000;
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = NonZeroUsize::new(10_000).unwrap();
pub const DEFAULT_TABLE: &str = "page_events";
pub const DEFAULT_DATABASE: &str = "analytics";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8123;
const DEFAULT_USER: &str = "default";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Connection settings for the ClickHouse HTTP interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickHouseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub connect_timeout: Duration,
}

impl Default for ClickHouseConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: DEFAULT_DATABASE.to_string(),
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

impl ClickHouseConfig {
    /// Read `CLICKHOUSE_*` variables, falling back to local defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("CLICKHOUSE_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "CLICKHOUSE_PORT")?.unwrap_or(defaults.port),
            database: lookup("CLICKHOUSE_DATABASE").unwrap_or(defaults.database),
            user: lookup("CLICKHOUSE_USER").unwrap_or(defaults.user),
            password: lookup("CLICKHOUSE_PASSWORD").unwrap_or(defaults.password),
            connect_timeout: parse_var(&lookup, "CLICKHOUSE_CONNECT_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
        })
    }

    /// Base URL of the HTTP interface, e.g. `http://127.0.0.1:8123/`
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| PageseedError::InvalidConfig {
            key: key.to_string(),
            reason: format!("{raw:?}: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClickHouseConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ClickHouseConfig::default());
        assert_eq!(config.endpoint(), "http://127.0.0.1:8123/");
        assert_eq!(config.database, "analytics");
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn overrides_are_honored() {
        let config = ClickHouseConfig::from_lookup(lookup_from(&[
            ("CLICKHOUSE_HOST", "clickhouse"),
            ("CLICKHOUSE_PORT", "18123"),
            ("CLICKHOUSE_DATABASE", "staging"),
            ("CLICKHOUSE_USER", "seeder"),
            ("CLICKHOUSE_PASSWORD", "secret"),
            ("CLICKHOUSE_CONNECT_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.endpoint(), "http://clickhouse:18123/");
        assert_eq!(config.database, "staging");
        assert_eq!(config.user, "seeder");
        assert_eq!(config.password, "secret");
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = ClickHouseConfig::from_lookup(lookup_from(&[("CLICKHOUSE_PORT", "http")]))
            .unwrap_err();
        match err {
            PageseedError::InvalidConfig { key, .. } => assert_eq!(key, "CLICKHOUSE_PORT"),
            other => panic!("unexpected error: {other}"),
        }

        assert!(ClickHouseConfig::from_lookup(lookup_from(&[("CLICKHOUSE_PORT", "70000")])).is_err());
    }
}
