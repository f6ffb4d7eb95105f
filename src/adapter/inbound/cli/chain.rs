use serde::Serialize;
use tabled::Tabled;

use crate::adapter::inbound::cli::output::{self, Text, View};
use crate::adapter::inbound::cli::session;
use crate::adapter::outbound::bitget::dto::ChainInfo;
use crate::domain::to_wire;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;

#[derive(Debug, Serialize, Tabled)]
struct ChainRow {
    #[tabled(rename = "Chain")]
    chain: String,
    #[tabled(rename = "Min Withdrawal")]
    min_withdrawal: String,
    #[tabled(rename = "Fee")]
    fee: String,
    #[tabled(rename = "Withdraw")]
    withdrawable: String,
    #[tabled(rename = "Deposit")]
    depositable: String,
}

impl ChainRow {
    fn from_chain(chain: &ChainInfo) -> Self {
        Self {
            chain: chain.canonical_name().unwrap_or_else(|| "-".into()),
            min_withdrawal: chain.min_withdrawal().map_or_else(|| "-".into(), to_wire),
            fee: chain.withdraw_fee().map_or_else(|| "-".into(), to_wire),
            withdrawable: flag(chain.withdrawable()),
            depositable: flag(chain.depositable()),
        }
    }
}

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".into(),
        Some(false) => "no".into(),
        None => "-".into(),
    }
}

#[derive(Debug, Serialize)]
struct ChainsView {
    coin: String,
    rows: Vec<ChainRow>,
}

impl View for ChainsView {
    const KIND: &'static str = "chains";

    fn render(&self, text: &mut Text) {
        text.title(&format!("{} Chains", self.coin));
        if self.rows.is_empty() {
            text.field("Chains", output::muted("none"));
        } else {
            text.table(&self.rows);
        }
    }
}

/// Networks a coin moves on, with withdrawal limits.
pub async fn execute_chains(config: &Config, symbol: Option<&str>) -> Result<()> {
    let symbol = session::symbol_or_default(symbol, config);
    let actions = session::connect(config).await?;
    let currency = actions
        .currency(&symbol)
        .await?
        .ok_or_else(|| Error::Command(format!("{symbol} is not listed on Bitget")))?;

    output::emit(&ChainsView {
        rows: currency.chains.iter().map(ChainRow::from_chain).collect(),
        coin: currency.symbol,
    });
    Ok(())
}
