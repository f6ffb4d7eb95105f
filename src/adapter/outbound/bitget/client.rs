//! Bitget client: picks a reachable entrypoint, wires the proxy, and exposes
//! the asset and subaccount sections over one shared transport.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::{info, warn};

use super::asset::Asset;
use super::credentials::Credentials;
use super::proxy::{check_proxy, normalize_proxy, redact};
use super::settings::BitgetConfig;
use super::subaccount::Subaccount;
use super::transport::{Transport, TIME_PATH};
use crate::error::ExchangeError;

/// Signed access to one Bitget account.
///
/// Clock offset and master uid are cached per instance.
pub struct BitgetClient {
    transport: Arc<Transport>,
    pub asset: Asset,
    pub subaccount: Subaccount,
    proxy_warning: Option<ExchangeError>,
}

impl BitgetClient {
    /// Build the HTTP client, check the proxy and select an entrypoint.
    ///
    /// A failed proxy self-test is kept as a warning, not an error.
    pub async fn connect(config: &BitgetConfig) -> Result<Self, ExchangeError> {
        let proxy = config.proxy.as_deref().map(normalize_proxy).transpose()?;
        let http = build_http(config, proxy.as_deref())?;

        let mut proxy_warning = None;
        if let (Some(proxy), true) = (proxy.as_deref(), config.check_proxy) {
            if let Err(err) = check_proxy(&http, &config.ip_echo_url, proxy).await {
                warn!(proxy = %redact(proxy), error = %err, "Proxy check failed");
                proxy_warning = Some(err);
            }
        }

        let reachability_timeout = Duration::from_millis(config.http.reachability_timeout_ms);
        let base_url = select_entrypoint(
            &http,
            &config.entrypoint_url,
            &config.fallback_urls,
            reachability_timeout,
        )
        .await;

        let mut client = Self::from_parts(http, base_url, config.credentials.clone());
        client.proxy_warning = proxy_warning;
        Ok(client)
    }

    /// Client over a prepared HTTP client and a fixed entrypoint.
    #[must_use]
    pub fn from_parts(http: HttpClient, base_url: impl Into<String>, credentials: Credentials) -> Self {
        let transport = Arc::new(Transport::new(http, base_url, credentials));
        Self {
            asset: Asset::new(Arc::clone(&transport)),
            subaccount: Subaccount::new(Arc::clone(&transport)),
            transport,
            proxy_warning: None,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Proxy self-test failure from [`Self::connect`], if any.
    #[must_use]
    pub fn proxy_warning(&self) -> Option<&ExchangeError> {
        self.proxy_warning.as_ref()
    }
}

/// HTTP client with the configured timeouts, routed through `proxy` if set.
pub fn build_http(config: &BitgetConfig, proxy: Option<&str>) -> Result<HttpClient, ExchangeError> {
    let mut builder = HttpClient::builder()
        .timeout(Duration::from_millis(config.http.timeout_ms))
        .connect_timeout(Duration::from_millis(config.http.connect_timeout_ms));
    if let Some(proxy) = proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(|err| ExchangeError::Proxy(format!("{}: {err}", redact(proxy))))?;
        builder = builder.proxy(proxy);
    }
    builder.build().map_err(ExchangeError::from)
}

/// True when `{base_url}/api/v2/public/time` answers with a 2xx status.
pub async fn endpoint_answers(http: &HttpClient, base_url: &str, timeout: Duration) -> bool {
    let url = format!("{}{TIME_PATH}", base_url.trim_end_matches('/'));
    match http.get(&url).timeout(timeout).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

/// First reachable of `preferred` then `fallbacks`; `preferred` when none are.
pub async fn select_entrypoint(
    http: &HttpClient,
    preferred: &str,
    fallbacks: &[String],
    timeout: Duration,
) -> String {
    if endpoint_answers(http, preferred, timeout).await {
        return preferred.to_string();
    }
    for candidate in fallbacks.iter().filter(|url| url.as_str() != preferred) {
        if endpoint_answers(http, candidate, timeout).await {
            info!(from = %preferred, to = %candidate, "Switched Bitget entrypoint");
            return candidate.clone();
        }
    }
    warn!(url = %preferred, "No Bitget entrypoint reachable, keeping configured one");
    preferred.to_string()
}
