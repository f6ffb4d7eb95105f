//! Balance views over the master account and its subaccounts.

use serde::Serialize;
use tabled::Tabled;

use crate::adapter::inbound::cli::output::{self, Text, View};
use crate::adapter::inbound::cli::session;
use crate::domain::{to_wire, SubaccountType};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

#[derive(Debug, Serialize)]
struct BalancesView {
    coin: String,
    master: String,
    subaccounts_frozen: String,
    subaccounts_empty: bool,
}

impl View for BalancesView {
    const KIND: &'static str = "balances";

    fn render(&self, text: &mut Text) {
        text.title(&format!("{} Balances", self.coin));
        text.field("Master", output::positive(&self.master));
        text.field("Sub frozen", &self.subaccounts_frozen);
        if self.subaccounts_empty {
            text.field("Sub free", output::muted("none"));
        } else {
            text.field("Sub free", output::highlight("available"));
            text.hint("run `coinferry collect` to move subaccount funds to the master account");
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct SubaccountRow {
    #[tabled(rename = "Subaccount")]
    subaccount: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Coin")]
    coin: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Frozen")]
    frozen: String,
}

#[derive(Debug, Serialize)]
struct SubaccountsView {
    count: usize,
    rows: Vec<SubaccountRow>,
}

impl View for SubaccountsView {
    const KIND: &'static str = "subaccounts";

    fn render(&self, text: &mut Text) {
        text.title("Subaccounts");
        text.field("Count", self.count);
        if self.rows.is_empty() {
            text.field("Balances", output::muted("none"));
        } else {
            text.table(&self.rows);
        }
    }
}

/// Master balance of one coin plus subaccount totals.
pub async fn execute_balances(config: &Config, symbol: Option<&str>) -> Result<()> {
    let symbol = session::symbol_or_default(symbol, config);
    let actions = session::connect(config).await?;

    let master = actions.master_balance(&symbol).await?;
    let frozen = actions.subaccounts_frozen_balance(&symbol).await?;
    let subaccounts_empty = actions.all_balances_are_zero(&symbol).await?;

    output::emit(&BalancesView {
        coin: symbol,
        master: to_wire(master),
        subaccounts_frozen: to_wire(frozen),
        subaccounts_empty,
    });
    Ok(())
}

/// Every subaccount with its spot balances, optionally for one coin.
pub async fn execute_subaccounts(config: &Config, symbol: Option<&str>) -> Result<()> {
    let actions = session::connect(config).await?;
    let assets = actions.client()?.subaccount.assets().await?;

    let rows = assets
        .iter()
        .flat_map(|sub| {
            let kind = sub.kind.map_or("-", SubaccountType::name);
            sub.balances
                .iter()
                .filter(|b| symbol.map_or(true, |s| b.symbol.eq_ignore_ascii_case(s)))
                .map(move |b| SubaccountRow {
                    subaccount: sub.id.clone(),
                    kind: kind.to_string(),
                    coin: b.symbol.clone(),
                    available: to_wire(b.available),
                    frozen: to_wire(b.frozen),
                })
        })
        .collect();

    output::emit(&SubaccountsView {
        count: assets.len(),
        rows,
    });
    Ok(())
}
