//! Configuration module - environment variable parsing

use std::env;
use std::net::SocketAddr;

use crate::game::tuning::GameTuning;

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Server binding address
    pub server_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Simulation ticks per second
    pub tick_rate_hz: u32,
    /// Capacity of the gateway -> arena event queue
    pub event_queue_capacity: usize,
    /// Snapshots buffered per connection before a slow client starts skipping
    pub snapshot_buffer: usize,

    /// Allowed client origins for CORS (empty = any origin)
    pub client_origins: Vec<String>,

    /// Gameplay constants
    pub tuning: GameTuning,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Hosting platforms provide PORT, fall back to SERVER_ADDR or default
        let server_addr = match lookup("PORT") {
            Some(port) => format!("0.0.0.0:{}", port),
            None => lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        };

        let tick_rate_hz = parse_or(&lookup, "TICK_RATE_HZ", 60u32)?;
        if !(1..=1000).contains(&tick_rate_hz) {
            return Err(ConfigError::OutOfRange("TICK_RATE_HZ"));
        }

        let event_queue_capacity = parse_or(&lookup, "EVENT_QUEUE_CAPACITY", 1024usize)?;
        if event_queue_capacity == 0 {
            return Err(ConfigError::OutOfRange("EVENT_QUEUE_CAPACITY"));
        }

        let snapshot_buffer = parse_or(&lookup, "SNAPSHOT_BUFFER", 16usize)?;
        if snapshot_buffer == 0 {
            return Err(ConfigError::OutOfRange("SNAPSHOT_BUFFER"));
        }

        let mut tuning = GameTuning::default();
        tuning.respawn_time_ms = parse_or(&lookup, "RESPAWN_TIME_MS", tuning.respawn_time_ms)?;

        let client_origins = lookup("CLIENT_ORIGIN")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            server_addr: server_addr
                .parse()
                .map_err(|_| ConfigError::InvalidAddress)?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            tick_rate_hz,
            event_queue_capacity,
            snapshot_buffer,
            client_origins,
            tuning,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Environment variable out of range: {0}")]
    OutOfRange(&'static str),

    #[error("Invalid server address format")]
    InvalidAddress,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.tuning.respawn_time_ms, 10_000);
        assert!(config.client_origins.is_empty());
    }

    #[test]
    fn port_wins_over_server_addr() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("SERVER_ADDR", "127.0.0.1:1234"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn parses_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("TICK_RATE_HZ", "30"),
            ("RESPAWN_TIME_MS", "500"),
            ("CLIENT_ORIGIN", "http://a.test, http://b.test,"),
        ]))
        .unwrap();
        assert_eq!(config.tick_rate_hz, 30);
        assert_eq!(config.tuning.respawn_time_ms, 500);
        assert_eq!(config.client_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("TICK_RATE_HZ", "fast")])),
            Err(ConfigError::Invalid("TICK_RATE_HZ"))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("TICK_RATE_HZ", "0")])),
            Err(ConfigError::OutOfRange("TICK_RATE_HZ"))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_from(&[("SERVER_ADDR", "nowhere")])),
            Err(ConfigError::InvalidAddress)
        ));
    }
}
