use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::adapter::inbound::cli::output::{self, Step, Text, View};
use crate::adapter::inbound::cli::session;
use crate::adapter::outbound::bitget::client::{build_http, endpoint_answers};
use crate::adapter::outbound::bitget::proxy::{check_proxy, normalize_proxy, redact};
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
struct ProxyView {
    proxy: String,
    ip_echo: String,
    egress_ip: String,
}

impl View for ProxyView {
    const KIND: &'static str = "proxy";

    fn render(&self, text: &mut Text) {
        text.title("Proxy Check");
        text.field("Proxy", &self.proxy);
        text.field("IP echo", &self.ip_echo);
        text.field("Egress IP", output::highlight(&self.egress_ip));
    }
}

#[derive(Debug, Serialize)]
struct EndpointView {
    reachable: Vec<String>,
    unreachable: Vec<String>,
}

impl View for EndpointView {
    const KIND: &'static str = "endpoints";

    fn render(&self, text: &mut Text) {
        text.title("Endpoint Check");
        for url in &self.reachable {
            text.success(url);
        }
        for url in &self.unreachable {
            text.warning(&format!("{url} unreachable"));
        }
    }
}

/// Route a request through the configured proxy and report the egress IP.
pub async fn execute_proxy(config_path: Option<&Path>) -> Result<()> {
    let config = session::load_config(config_path)?;
    let bitget = &config.bitget;

    let Some(raw) = bitget.proxy.as_deref() else {
        output::hint("no proxy configured; set bitget.proxy in the config file to use one");
        return Ok(());
    };

    let proxy = normalize_proxy(raw)?;
    let http = build_http(bitget, Some(&proxy))?;
    let step = Step::start("Checking egress IP...");
    match check_proxy(&http, &bitget.ip_echo_url, &proxy).await {
        Ok(ip) => {
            step.done("Proxy answers from its own address");
            output::emit(&ProxyView {
                proxy: redact(&proxy),
                ip_echo: bitget.ip_echo_url.clone(),
                egress_ip: ip,
            });
            Ok(())
        }
        Err(err) => {
            step.failed("Proxy check failed");
            Err(err.into())
        }
    }
}

/// Check the entrypoint and each fallback.
pub async fn execute_endpoint(config_path: Option<&Path>) -> Result<()> {
    let config = session::load_config(config_path)?;
    let bitget = &config.bitget;
    let proxy = bitget.proxy.as_deref().map(normalize_proxy).transpose()?;
    let http = build_http(bitget, proxy.as_deref())?;
    let timeout = Duration::from_millis(bitget.http.reachability_timeout_ms);

    let mut candidates = vec![bitget.entrypoint_url.clone()];
    candidates.extend(
        bitget
            .fallback_urls
            .iter()
            .filter(|url| **url != bitget.entrypoint_url)
            .cloned(),
    );

    let mut view = EndpointView {
        reachable: Vec::new(),
        unreachable: Vec::new(),
    };
    for url in candidates {
        let step = Step::start(&format!("Probing {url}..."));
        if endpoint_answers(&http, &url, timeout).await {
            step.done(&url);
            view.reachable.push(url);
        } else {
            step.failed(&format!("{url} unreachable"));
            view.unreachable.push(url);
        }
    }
    output::emit(&view);

    if view.reachable.is_empty() {
        return Err(Error::Command("no Bitget entrypoint is reachable".to_string()));
    }
    Ok(())
}
