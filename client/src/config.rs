use std::env;
use std::time::Duration;

use zeronight_shared::constants::DEFAULT_API_BASE_URL;
use zeronight_shared::rate_limit::GUESS_COOLDOWN;

use crate::error::ConfigError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_NOTICE_TIMEOUT: Duration = Duration::from_millis(2600);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub guess_cooldown: Duration,
    pub notice_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            guess_cooldown: GUESS_COOLDOWN,
            notice_timeout: DEFAULT_NOTICE_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Reads `ZERONIGHT_*` variables, loading a `.env` file first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |key: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| ConfigError::Invalid { key, value: raw }),
            }
        };

        let api_base_url = lookup("ZERONIGHT_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or(defaults.api_base_url);

        // tokio intervals reject a zero period
        let poll_interval = millis("ZERONIGHT_POLL_MS", defaults.poll_interval)?;
        if poll_interval.is_zero() {
            return Err(ConfigError::Invalid {
                key: "ZERONIGHT_POLL_MS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            api_base_url,
            poll_interval,
            guess_cooldown: millis("ZERONIGHT_GUESS_COOLDOWN_MS", defaults.guess_cooldown)?,
            notice_timeout: millis("ZERONIGHT_NOTICE_MS", defaults.notice_timeout)?,
            request_timeout: millis("ZERONIGHT_REQUEST_TIMEOUT_MS", defaults.request_timeout)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.guess_cooldown, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("ZERONIGHT_API_URL", "https://example.test/"),
            ("ZERONIGHT_POLL_MS", "1000"),
        ]
        .into();
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.api_base_url, "https://example.test");
        assert_eq!(config.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_number() {
        let err = ClientConfig::from_lookup(|k| (k == "ZERONIGHT_NOTICE_MS").then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ZERONIGHT_NOTICE_MS", .. }));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = ClientConfig::from_lookup(|k| (k == "ZERONIGHT_POLL_MS").then(|| "0".to_string())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "ZERONIGHT_POLL_MS", .. }));
    }
}
