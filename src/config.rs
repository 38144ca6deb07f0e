//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Longest accepted `CACHE_EXPIRY`, one year
pub const MAX_TTL_SECONDS: f64 = 365.0 * 24.0 * 3600.0;

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backing store host
    pub redis_host: String,
    /// Backing store port
    pub redis_port: u16,
    /// Maximum number of entries in the local cache
    pub capacity: usize,
    /// Lifetime of a local entry in seconds, fractions allowed
    pub ttl_seconds: f64,
    /// Address the HTTP listener binds to
    pub proxy_ip: IpAddr,
    /// Port the HTTP listener binds to
    pub proxy_port: u16,
    /// Maximum number of requests handled at once
    pub max_concurrent_requests: usize,
    /// Log destination; stdout when unset
    pub log_file: Option<PathBuf>,
    /// Per-call timeout for backing store commands, in milliseconds
    pub backing_timeout_ms: u64,
    /// Number of pooled backing store connections
    pub redis_pool_size: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `REDIS_SERVER_IP` - Backing store host (default: 127.0.0.1)
    /// - `REDIS_SERVER_PORT` - Backing store port (default: 6379)
    /// - `CACHE_CAPACITY` - Local cache capacity (default: 1000)
    /// - `CACHE_EXPIRY` - Local entry TTL in seconds (default: 15.0)
    /// - `PROXY_IP` - Listener address (default: 0.0.0.0)
    /// - `PROXY_PORT` - Listener port (default: 8080)
    /// - `MAX_CONCURRENT_REQUESTS` - In-flight request limit (default: 64)
    /// - `LOG_FILE` - Log file path (default: stdout)
    /// - `BACKING_TIMEOUT_MS` - Backing store call timeout (default: 1000)
    /// - `REDIS_POOL_SIZE` - Pooled connections (default: 16)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_host: env::var("REDIS_SERVER_IP").unwrap_or(defaults.redis_host),
            redis_port: env_or("REDIS_SERVER_PORT", defaults.redis_port),
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            ttl_seconds: env_or("CACHE_EXPIRY", defaults.ttl_seconds),
            proxy_ip: env_or("PROXY_IP", defaults.proxy_ip),
            proxy_port: env_or("PROXY_PORT", defaults.proxy_port),
            max_concurrent_requests: env_or(
                "MAX_CONCURRENT_REQUESTS",
                defaults.max_concurrent_requests,
            ),
            log_file: env::var_os("LOG_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            backing_timeout_ms: env_or("BACKING_TIMEOUT_MS", defaults.backing_timeout_ms),
            redis_pool_size: env_or("REDIS_POOL_SIZE", defaults.redis_pool_size),
        }
    }

    /// Rejects values the cache cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let ttl_ok = Duration::try_from_secs_f64(self.ttl_seconds)
            .is_ok_and(|ttl| !ttl.is_zero() && self.ttl_seconds <= MAX_TTL_SECONDS);
        if !ttl_ok {
            return Err(ConfigError::InvalidExpiry(self.ttl_seconds));
        }
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.backing_timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.redis_pool_size == 0 {
            return Err(ConfigError::ZeroPoolSize);
        }
        Ok(())
    }

    /// Local entry lifetime. Call after [`validate`](Self::validate); an
    /// unrepresentable value maps to `Duration::MAX`, which never expires.
    pub fn ttl(&self) -> Duration {
        Duration::try_from_secs_f64(self.ttl_seconds).unwrap_or(Duration::MAX)
    }

    pub fn backing_timeout(&self) -> Duration {
        Duration::from_millis(self.backing_timeout_ms)
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}", self.redis_host, self.redis_port)
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.proxy_ip, self.proxy_port)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_host: "127.0.0.1".to_string(),
            redis_port: 6379,
            capacity: 1000,
            ttl_seconds: 15.0,
            proxy_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            proxy_port: 8080,
            max_concurrent_requests: 64,
            log_file: None,
            backing_timeout_ms: 1000,
            redis_pool_size: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.ttl_seconds, 15.0);
        assert_eq!(config.proxy_port, 8080);
        assert_eq!(config.redis_url(), "redis://127.0.0.1:6379");
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8080");
        assert!(config.log_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("CACHE_CAPACITY", "3");
        env::set_var("CACHE_EXPIRY", "0.5");
        env::set_var("REDIS_SERVER_PORT", "not-a-port");
        env::remove_var("LOG_FILE");

        let config = Config::from_env();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.ttl(), Duration::from_millis(500));
        assert_eq!(config.redis_port, 6379, "invalid values fall back to defaults");
        assert!(config.log_file.is_none());

        env::remove_var("CACHE_CAPACITY");
        env::remove_var("CACHE_EXPIRY");
        env::remove_var("REDIS_SERVER_PORT");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            capacity: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));

        for ttl in [0.0, -1.0, 1e-12, f64::NAN, f64::INFINITY, 1e19, MAX_TTL_SECONDS + 1.0] {
            let config = Config {
                ttl_seconds: ttl,
                ..Config::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidExpiry(_))));
        }

        let config = Config {
            max_concurrent_requests: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroConcurrency));

        let config = Config {
            backing_timeout_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }

    #[test]
    fn test_validate_accepts_ttl_bound() {
        let config = Config {
            ttl_seconds: MAX_TTL_SECONDS,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.ttl(), Duration::from_secs(365 * 24 * 3600));
    }

    #[test]
    fn test_ttl_never_panics() {
        let config = Config {
            ttl_seconds: 1e19,
            ..Config::default()
        };
        assert_eq!(config.ttl(), Duration::MAX);
    }

    #[test]
    fn test_durations() {
        let config = Config {
            ttl_seconds: 2.25,
            backing_timeout_ms: 150,
            ..Config::default()
        };
        assert_eq!(config.ttl(), Duration::from_millis(2250));
        assert_eq!(config.backing_timeout(), Duration::from_millis(150));
    }
}
