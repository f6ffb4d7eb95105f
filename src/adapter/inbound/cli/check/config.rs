use std::path::Path;

use serde::Serialize;

use crate::adapter::inbound::cli::output::{self, Text, View};
use crate::adapter::inbound::cli::session;
use crate::adapter::outbound::bitget::proxy::{normalize_proxy, redact};
use crate::domain::to_wire;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

#[derive(Debug, Serialize)]
struct ConfigView {
    /// `None` when running on defaults.
    path: Option<String>,
    entrypoint: String,
    fallbacks: Vec<String>,
    /// Normalized proxy with the password masked.
    proxy: Option<String>,
    credentials: bool,
    token: String,
    chains: Vec<String>,
    amount_min: String,
    amount_max: String,
    delay_min_secs: u64,
    delay_max_secs: u64,
    cutoff_timestamp: Option<i64>,
}

impl ConfigView {
    #[allow(clippy::result_large_err)]
    fn new(path: Option<&Path>, config: &Config) -> Result<Self> {
        let bitget = &config.bitget;
        let withdrawal = &config.withdrawal;
        let proxy = match bitget.proxy.as_deref() {
            Some(raw) => Some(redact(&normalize_proxy(raw)?)),
            None => None,
        };
        Ok(Self {
            path: path.map(|p| p.display().to_string()),
            entrypoint: bitget.entrypoint_url.clone(),
            fallbacks: bitget.fallback_urls.clone(),
            proxy,
            credentials: bitget.credentials.is_complete(),
            token: withdrawal.token.clone(),
            chains: withdrawal.chains.clone(),
            amount_min: to_wire(withdrawal.amount_min),
            amount_max: to_wire(withdrawal.amount_max),
            delay_min_secs: withdrawal.delay_min_secs,
            delay_max_secs: withdrawal.delay_max_secs,
            cutoff_timestamp: withdrawal.cutoff_timestamp,
        })
    }
}

impl View for ConfigView {
    const KIND: &'static str = "config";

    fn render(&self, text: &mut Text) {
        text.title("Configuration Check");
        text.field("Config", self.path.as_deref().unwrap_or("defaults (no file)"));
        text.success("Configuration is valid");

        text.title("Bitget");
        text.field("Entrypoint", &self.entrypoint);
        text.field("Fallbacks", self.fallbacks.join(", "));
        text.field("Proxy", self.proxy.as_deref().unwrap_or("none"));
        if self.credentials {
            text.success("API credentials detected");
        } else {
            text.warning(
                "API credentials not configured (set BITGET_API_KEY, BITGET_API_SECRET and BITGET_PASSPHRASE)",
            );
        }

        text.title("Withdrawal");
        text.field("Token", &self.token);
        text.field("Chains", self.chains.join(", "));
        text.field("Amount", format!("{} - {}", self.amount_min, self.amount_max));
        text.field(
            "Delay",
            format!("{}s - {}s", self.delay_min_secs, self.delay_max_secs),
        );
        if let Some(cutoff) = self.cutoff_timestamp {
            text.field("Cutoff", cutoff);
        }
    }
}

/// Validate configuration without contacting the exchange.
#[allow(clippy::result_large_err)]
pub fn execute_config(config_path: Option<&Path>) -> Result<()> {
    let path = session::resolve_path(config_path);
    let config = session::load_config(config_path)?;
    output::emit(&ConfigView::new(path.as_deref(), &config)?);
    Ok(())
}
