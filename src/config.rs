use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.runware.ai/v1";

#[derive(Debug, Clone)]
pub struct RunwareConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout: Option<Duration>,
}

impl Default for RunwareConfig {
    fn default() -> Self {
        RunwareConfig {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

impl RunwareConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("RUNWARE_API_KEY").ok().filter(|key| !key.is_empty());
        let api_url = env::var("RUNWARE_API_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout = env::var("RUNWARE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);

        RunwareConfig {
            api_key,
            api_url,
            timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Key with everything but the first four characters hidden, for logs.
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            Some(key) => {
                let visible: String = key.chars().take(4).collect();
                format!("{}****", visible)
            }
            None => "<unset>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_endpoint() {
        let config = RunwareConfig::new();
        assert_eq!(config.api_url, "https://api.runware.ai/v1");
        assert!(config.api_key.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn builder_overrides() {
        let config = RunwareConfig::new()
            .with_api_key("abcdef123")
            .with_api_url("http://localhost:9000/v1")
            .with_timeout(Duration::from_secs(30));
        assert_eq!(config.api_key.as_deref(), Some("abcdef123"));
        assert_eq!(config.api_url, "http://localhost:9000/v1");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.masked_api_key(), "abcd****");
    }
}
