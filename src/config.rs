use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub line_channel_access_token: String,
    pub line_channel_secret: String,
    pub gas_web_app_url: String,
    pub openai_api_key: String,
    pub host: String,
    pub port: u16,
    pub openai_model: String,
    pub openai_base_url: String,
    pub line_api_base_url: String,
    pub http_timeout: Duration,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config through an arbitrary variable lookup so it can be
    /// exercised without touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> anyhow::Result<String> {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("Missing required environment variable {}", key))
        };

        let line_channel_access_token = required("LINE_CHANNEL_ACCESS_TOKEN")?;
        let line_channel_secret = required("LINE_CHANNEL_SECRET")?;
        let gas_web_app_url = required("GAS_WEB_APP_URL")?;
        let openai_api_key = required("OPENAI_API_KEY")?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .unwrap_or(8080);

        let openai_model = lookup("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string());

        let openai_base_url = lookup("OPENAI_BASE_URL")
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        let line_api_base_url = lookup("LINE_API_BASE_URL")
            .unwrap_or_else(|| "https://api.line.me".to_string())
            .trim_end_matches('/')
            .to_string();

        let http_timeout_secs: u64 = lookup("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .unwrap_or(30);

        let log_dir = lookup("LOG_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            line_channel_access_token,
            line_channel_secret,
            gas_web_app_url,
            openai_api_key,
            host,
            port,
            openai_model,
            openai_base_url,
            line_api_base_url,
            http_timeout: Duration::from_secs(http_timeout_secs),
            log_dir,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|e| anyhow::anyhow!("Invalid socket address: {}", e))
    }
}

// Secrets stay out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("line_channel_access_token", &"<redacted>")
            .field("line_channel_secret", &"<redacted>")
            .field("gas_web_app_url", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("openai_model", &self.openai_model)
            .field("openai_base_url", &self.openai_base_url)
            .field("line_api_base_url", &self.line_api_base_url)
            .field("http_timeout", &self.http_timeout)
            .field("log_dir", &self.log_dir)
            .finish()
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

    const REQUIRED: &[(&str, &str)] = &[
        ("LINE_CHANNEL_ACCESS_TOKEN", "access-token"),
        ("LINE_CHANNEL_SECRET", "channel-secret"),
        ("GAS_WEB_APP_URL", "https://script.google.com/macros/s/abc/exec"),
        ("OPENAI_API_KEY", "sk-test"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.line_api_base_url, "https://api.line.me");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.log_dir.is_none());
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_missing_required_variable_is_named() {
        let partial = &REQUIRED[..3];
        let err = Config::from_lookup(lookup_from(partial)).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_blank_required_variable_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("LINE_CHANNEL_SECRET", "   ");
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("LINE_CHANNEL_SECRET"));
    }

    #[test]
    fn test_overrides_and_trailing_slash() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "9090"));
        pairs.push(("HOST", "127.0.0.1"));
        pairs.push(("OPENAI_BASE_URL", "http://localhost:11434/v1/"));
        pairs.push(("LINE_API_BASE_URL", "http://localhost:9999/"));
        pairs.push(("HTTP_TIMEOUT_SECS", "5"));
        pairs.push(("LOG_DIR", "/tmp/golfbay"));

        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:9090");
        assert_eq!(config.openai_base_url, "http://localhost:11434/v1");
        assert_eq!(config.line_api_base_url, "http://localhost:9999");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/golfbay")));
    }

    #[test]
    fn test_unparsable_port_falls_back() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "not-a-port"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("sk-test"));
        assert!(!rendered.contains("channel-secret"));
        assert!(!rendered.contains("access-token"));
    }
}
