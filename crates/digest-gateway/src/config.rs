//! Gateway configuration.
//!
//! Configuration is explicit: the access token and the backend location are
//! passed to every gateway at construction instead of being read from
//! ambient storage at call time.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DIGEST_BACKEND_URL` | `http://localhost:7878` | Backend base URL |
//! | `GOOGLE_ACCESS_TOKEN` | unset | OAuth bearer token from the sign-in flow |
//! | `DIGEST_EMAIL_DAYS` | `2` | Days of mail history to load |
//! | `DIGEST_TASK_LOOKAHEAD_DAYS` | `7` | Days ahead to include tasks |
//! | `DIGEST_HTTP_TIMEOUT_SECS` | `60` | Per-request timeout |

use std::fmt;

use tracing::debug;

use digest_core::{defaults, Error, Result};

/// Connection settings shared by all gateways.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Backend base URL, without trailing slash.
    pub base_url: String,
    /// OAuth access token. Emails tolerate its absence; agenda calls do not.
    pub access_token: Option<String>,
    /// Days of mail history requested by the email gateway.
    pub email_lookback_days: u32,
    /// Days ahead requested by the task gateway.
    pub task_look_ahead_days: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

// Keep the token out of logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("email_lookback_days", &self.email_lookback_days)
            .field("task_look_ahead_days", &self.task_look_ahead_days)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BACKEND_URL.to_string(),
            access_token: None,
            email_lookback_days: defaults::EMAIL_LOOKBACK_DAYS,
            task_look_ahead_days: defaults::TASK_LOOK_AHEAD_DAYS,
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    /// Create a config for the given backend with defaults elsewhere.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Create config from environment variables (with defaults).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Unparseable numbers fall
    /// back to their defaults; an empty token counts as no token.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("DIGEST_BACKEND_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| defaults::BACKEND_URL.to_string());

        let access_token = lookup("GOOGLE_ACCESS_TOKEN").filter(|t| !t.trim().is_empty());

        let email_lookback_days = lookup("DIGEST_EMAIL_DAYS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults::EMAIL_LOOKBACK_DAYS);

        let task_look_ahead_days = lookup("DIGEST_TASK_LOOKAHEAD_DAYS")
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(defaults::TASK_LOOK_AHEAD_DAYS);

        let timeout_secs = lookup("DIGEST_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::HTTP_TIMEOUT_SECS);

        let config = Self {
            base_url,
            access_token,
            email_lookback_days,
            task_look_ahead_days,
            timeout_secs,
        };
        debug!(?config, "Gateway config resolved");
        config
    }

    /// Set the access token.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the email lookback window.
    pub fn with_email_lookback_days(mut self, days: u32) -> Self {
        self.email_lookback_days = days;
        self
    }

    /// Set the task look-ahead window.
    pub fn with_task_look_ahead_days(mut self, days: u32) -> Self {
        self.task_look_ahead_days = days;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("backend base_url cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "backend base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be positive".to_string()));
        }

        Ok(())
    }

    /// Absolute URL for an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
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
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.base_url, "http://localhost:7878");
        assert!(config.access_token.is_none());
        assert_eq!(config.email_lookback_days, 2);
        assert_eq!(config.task_look_ahead_days, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_empty_uses_defaults() {
        let config = GatewayConfig::from_lookup(|_| None);
        assert_eq!(config.base_url, defaults::BACKEND_URL);
        assert_eq!(config.timeout_secs, defaults::HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("DIGEST_BACKEND_URL", "http://10.0.0.2:9000/"),
            ("GOOGLE_ACCESS_TOKEN", "ya29.token"),
            ("DIGEST_EMAIL_DAYS", "5"),
            ("DIGEST_TASK_LOOKAHEAD_DAYS", "14"),
            ("DIGEST_HTTP_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(config.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.access_token.as_deref(), Some("ya29.token"));
        assert_eq!(config.email_lookback_days, 5);
        assert_eq!(config.task_look_ahead_days, 14);
        assert_eq!(config.timeout_secs, 3);
    }

    #[test]
    fn test_from_lookup_bad_numbers_fall_back() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("DIGEST_EMAIL_DAYS", "two"),
            ("DIGEST_HTTP_TIMEOUT_SECS", "-1"),
        ]));
        assert_eq!(config.email_lookback_days, defaults::EMAIL_LOOKBACK_DAYS);
        assert_eq!(config.timeout_secs, defaults::HTTP_TIMEOUT_SECS);
    }

    #[test]
    fn test_blank_token_is_no_token() {
        let config = GatewayConfig::from_lookup(lookup_from(&[("GOOGLE_ACCESS_TOKEN", "  ")]));
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        assert!(GatewayConfig::new("").validate().is_err());
        assert!(GatewayConfig::new("localhost:7878").validate().is_err());
        assert!(GatewayConfig::new("https://digest.local").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = GatewayConfig::default().with_timeout_secs(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_endpoint_joins_path() {
        let config = GatewayConfig::new("http://localhost:7878/");
        assert_eq!(
            config.endpoint(defaults::SUMMARIZE_PATH),
            "http://localhost:7878/api/summarize_email"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = GatewayConfig::default().with_access_token("secret-token");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
