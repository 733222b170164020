//! Configuration for the tracking resolver.

use serde::{Deserialize, Serialize};

/// Tracking resolver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Page that hands out session cookies and embeds the lookup endpoint.
    #[serde(default = "default_landing_url")]
    pub landing_url: String,

    /// User-Agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Cookie (`name=value`) added to the cookies issued by the landing page.
    /// Empty disables it.
    #[serde(default = "default_extra_cookie")]
    pub extra_cookie: String,

    /// Text preceding the quoted lookup endpoint in the landing page.
    #[serde(default = "default_endpoint_marker")]
    pub endpoint_marker: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_landing_url() -> String {
    "https://www.pochta.ru/tracking".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/70.0.3538.77 Safari/537.36".to_string()
}

fn default_extra_cookie() -> String {
    "cookiesAccepted=true".to_string()
}

fn default_endpoint_marker() -> String {
    "getTrackingsByBarcodesUrl:\"".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            landing_url: default_landing_url(),
            user_agent: default_user_agent(),
            extra_cookie: default_extra_cookie(),
            endpoint_marker: default_endpoint_marker(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ResolverConfig {
    /// Sets the landing page URL.
    pub fn with_landing_url(mut self, url: impl Into<String>) -> Self {
        self.landing_url = url.into();
        self
    }

    /// Sets the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResolverConfig::default();
        assert_eq!(config.landing_url, "https://www.pochta.ru/tracking");
        assert_eq!(config.endpoint_marker, "getTrackingsByBarcodesUrl:\"");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_deserialize_partial() {
        let toml = r#"
            user_agent = "form22-test"
            timeout_secs = 5
        "#;
        let config: ResolverConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.user_agent, "form22-test");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.extra_cookie, "cookiesAccepted=true");
    }
}
