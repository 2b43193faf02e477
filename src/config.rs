use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::ConfigError;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MIN_PARAGRAPH_LENGTH: usize = 20;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Knobs for a single extraction.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Upper bound on the whole fetch (connect, headers and body).
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Paragraphs are kept only when their trimmed length is strictly greater.
    pub min_paragraph_length: usize,
}

impl ExtractConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_paragraph_length: DEFAULT_MIN_PARAGRAPH_LENGTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_addr: SocketAddr,
    pub extract: ExtractConfig,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "3000".to_string());
        let port = port
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidPort(e.to_string()))?;
        let ip = IpAddr::from_str(&host).map_err(|e| ConfigError::InvalidHost(e.to_string()))?;

        let timeout_ms = parse_or("SCRAPE_TIMEOUT_MS", &lookup, DEFAULT_TIMEOUT_MS)?;
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SCRAPE_TIMEOUT_MS",
                message: "must be greater than zero".to_string(),
            });
        }
        let min_paragraph_length = parse_or(
            "SCRAPE_MIN_PARAGRAPH_LENGTH",
            &lookup,
            DEFAULT_MIN_PARAGRAPH_LENGTH,
        )?;
        let user_agent = lookup("SCRAPE_USER_AGENT")
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            extract: ExtractConfig {
                timeout_ms,
                user_agent,
                min_paragraph_length,
            },
        })
    }
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidValue {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
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
    fn defaults_when_env_is_empty() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.server_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.extract.timeout_ms, 10_000);
        assert_eq!(config.extract.min_paragraph_length, 20);
        assert_eq!(config.extract.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn overrides_are_applied() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "8080"),
            ("SCRAPE_TIMEOUT_MS", "2500"),
            ("SCRAPE_USER_AGENT", "test-agent/1.0"),
            ("SCRAPE_MIN_PARAGRAPH_LENGTH", "5"),
        ]))
        .unwrap();
        assert_eq!(config.server_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.extract.timeout(), Duration::from_millis(2500));
        assert_eq!(config.extract.user_agent, "test-agent/1.0");
        assert_eq!(config.extract.min_paragraph_length, 5);
    }

    #[test]
    fn rejects_bad_port() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort(_)));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Config::from_lookup(lookup_from(&[("SCRAPE_TIMEOUT_MS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "SCRAPE_TIMEOUT_MS", .. }));
    }
}
