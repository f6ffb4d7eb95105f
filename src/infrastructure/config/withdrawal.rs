//! Withdrawal dispatch configuration.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::Chain;

/// What to withdraw to wallets and how to pace it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WithdrawalConfig {
    /// Coin to withdraw.
    #[serde(default = "default_token")]
    pub token: String,
    /// User-facing chain names; one is picked per withdrawal.
    #[serde(default = "default_chains")]
    pub chains: Vec<String>,
    #[serde(default = "default_amount_min")]
    pub amount_min: Decimal,
    #[serde(default = "default_amount_max")]
    pub amount_max: Decimal,
    /// Only withdrawals before this time (seconds) count when checking status.
    #[serde(default)]
    pub cutoff_timestamp: Option<i64>,
    /// Pause after a successful withdrawal, lower bound in seconds.
    #[serde(default = "default_delay_min_secs")]
    pub delay_min_secs: u64,
    /// Pause after a successful withdrawal, upper bound in seconds.
    #[serde(default = "default_delay_max_secs")]
    pub delay_max_secs: u64,
}

fn default_token() -> String {
    "ETH".into()
}

fn default_chains() -> Vec<String> {
    vec![Chain::Optimism.display_name().to_string()]
}

fn default_amount_min() -> Decimal {
    Decimal::new(1, 3)
}

fn default_amount_max() -> Decimal {
    Decimal::new(2, 3)
}

const fn default_delay_min_secs() -> u64 {
    180
}

const fn default_delay_max_secs() -> u64 {
    360
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self {
            token: default_token(),
            chains: default_chains(),
            amount_min: default_amount_min(),
            amount_max: default_amount_max(),
            cutoff_timestamp: None,
            delay_min_secs: default_delay_min_secs(),
            delay_max_secs: default_delay_max_secs(),
        }
    }
}
