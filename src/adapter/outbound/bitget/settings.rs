//! Bitget connection configuration.

use serde::Deserialize;

use super::credentials::Credentials;

/// Bitget HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BitgetHttpConfig {
    /// Request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_http_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Timeout for endpoint and proxy reachability checks in milliseconds.
    #[serde(default = "default_http_reachability_timeout_ms")]
    pub reachability_timeout_ms: u64,
}

const fn default_http_timeout_ms() -> u64 {
    10_000
}

const fn default_http_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_http_reachability_timeout_ms() -> u64 {
    10_000
}

impl Default for BitgetHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_http_timeout_ms(),
            connect_timeout_ms: default_http_connect_timeout_ms(),
            reachability_timeout_ms: default_http_reachability_timeout_ms(),
        }
    }
}

/// Bitget exchange configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BitgetConfig {
    /// Preferred REST entrypoint.
    #[serde(default = "default_entrypoint_url")]
    pub entrypoint_url: String,
    /// Entrypoints tried in order when the preferred one is unreachable.
    #[serde(default = "default_fallback_urls")]
    pub fallback_urls: Vec<String>,
    /// Optional proxy: `login:password@host:port`, `http://...` or `socks5://...`.
    #[serde(default)]
    pub proxy: Option<String>,
    /// Verify the proxy's egress IP at startup.
    #[serde(default = "default_check_proxy")]
    pub check_proxy: bool,
    /// Service that echoes the caller's IP as plain text.
    #[serde(default = "default_ip_echo_url")]
    pub ip_echo_url: String,
    #[serde(default)]
    pub http: BitgetHttpConfig,
    /// Loaded from `BITGET_API_KEY`, `BITGET_API_SECRET` and
    /// `BITGET_PASSPHRASE` at runtime (never from the config file).
    #[serde(skip)]
    pub credentials: Credentials,
}

fn default_entrypoint_url() -> String {
    "https://api.bitget.com".into()
}

fn default_fallback_urls() -> Vec<String> {
    vec![
        "https://api.bitget.com".into(),
        "https://api.bitgetglobal.com".into(),
        "https://capi.bitget.com".into(),
    ]
}

const fn default_check_proxy() -> bool {
    true
}

fn default_ip_echo_url() -> String {
    "http://eth0.me/".into()
}

impl Default for BitgetConfig {
    fn default() -> Self {
        Self {
            entrypoint_url: default_entrypoint_url(),
            fallback_urls: default_fallback_urls(),
            proxy: None,
            check_proxy: default_check_proxy(),
            ip_echo_url: default_ip_echo_url(),
            http: BitgetHttpConfig::default(),
            credentials: Credentials::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_entrypoints() {
        let config = BitgetConfig::default();
        assert_eq!(config.entrypoint_url, "https://api.bitget.com");
        assert_eq!(config.fallback_urls.len(), 3);
        assert!(config.check_proxy);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: BitgetConfig = toml::from_str(
            r#"
proxy = "user:pass@10.0.0.1:8080"
[http]
timeout_ms = 2500
"#,
        )
        .expect("parse");
        assert_eq!(config.http.timeout_ms, 2500);
        assert_eq!(config.http.connect_timeout_ms, 5_000);
        assert_eq!(config.proxy.as_deref(), Some("user:pass@10.0.0.1:8080"));
        assert!(!config.credentials.is_complete());
    }
}
