//! Clients pointed at a [`ScriptedExchange`](super::exchange::ScriptedExchange).

use std::time::Duration;

use crate::adapter::outbound::bitget::{BitgetClient, BitgetConfig, BitgetHttpConfig, Credentials};
use crate::application::BitgetActions;

pub const API_KEY: &str = "test-key";
pub const SECRET_KEY: &str = "test-secret";
pub const PASSPHRASE: &str = "test-passphrase";

pub fn credentials() -> Credentials {
    Credentials::new(API_KEY, SECRET_KEY, PASSPHRASE)
}

/// Short timeouts so a dead endpoint fails fast.
pub fn http_config() -> BitgetHttpConfig {
    BitgetHttpConfig {
        timeout_ms: 2_000,
        connect_timeout_ms: 500,
        reachability_timeout_ms: 500,
    }
}

/// Config for `base_url` with test credentials, no proxy and no fallbacks.
pub fn config(base_url: &str) -> BitgetConfig {
    BitgetConfig {
        entrypoint_url: base_url.to_string(),
        fallback_urls: Vec::new(),
        proxy: None,
        check_proxy: false,
        http: http_config(),
        credentials: credentials(),
        ..BitgetConfig::default()
    }
}

/// Client bound directly to `base_url`, skipping entrypoint probing.
pub fn client(base_url: &str) -> BitgetClient {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_millis(http_config().timeout_ms))
        .build()
        .expect("http client");
    BitgetClient::from_parts(http, base_url, credentials())
}

pub fn actions(base_url: &str) -> BitgetActions {
    BitgetActions::new(client(base_url))
}

/// URL of a local port with nothing listening on it.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind unused port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
