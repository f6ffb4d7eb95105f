use serde::Serialize;

use crate::adapter::inbound::cli::output::{self, Step, Text, View};
use crate::adapter::inbound::cli::session;
use crate::application::CollectReport;
use crate::domain::to_wire;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;

#[derive(Debug, Serialize)]
struct CollectedRow {
    subaccount: String,
    amount: String,
    transfer_id: u64,
}

#[derive(Debug, Serialize)]
struct FailedRow {
    /// `None` when the subaccount list itself could not be read.
    subaccount: Option<String>,
    error: String,
}

#[derive(Debug, Serialize)]
struct CollectView {
    coin: String,
    total: String,
    transfers: Vec<CollectedRow>,
    failures: Vec<FailedRow>,
}

impl CollectView {
    fn new(coin: String, report: &CollectReport) -> Self {
        Self {
            coin,
            total: to_wire(report.total()),
            transfers: report
                .transfers
                .iter()
                .map(|t| CollectedRow {
                    subaccount: t.subaccount_id.clone(),
                    amount: to_wire(t.amount),
                    transfer_id: t.transfer_id,
                })
                .collect(),
            failures: report
                .failures
                .iter()
                .map(|f| FailedRow {
                    subaccount: f.subaccount_id.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
        }
    }
}

impl View for CollectView {
    const KIND: &'static str = "collect";

    fn render(&self, text: &mut Text) {
        text.title("Collected");
        for row in &self.transfers {
            text.field(
                &row.subaccount,
                format!("{} {} (transfer {})", row.amount, self.coin, row.transfer_id),
            );
        }
        for row in &self.failures {
            let who = row.subaccount.as_deref().unwrap_or("subaccounts");
            text.warning(&format!("{who}: {}", row.error));
        }
        text.field("Total", output::positive(format!("{} {}", self.total, self.coin)));
    }
}

/// Sweep every subaccount balance of a coin into the master account.
pub async fn execute_collect(config: &Config, symbol: Option<&str>) -> Result<()> {
    let symbol = session::symbol_or_default(symbol, config);
    let actions = session::connect(config).await?;

    let step = Step::start(&format!("Collecting {symbol} from subaccounts..."));
    let report = actions.collect_funds_from_subaccounts(&symbol).await;
    if report.failures.is_empty() {
        step.done("Collection finished");
    } else {
        step.failed("Collection finished with failures");
    }

    output::emit(&CollectView::new(symbol, &report));

    if report.transfers.is_empty() && !report.failures.is_empty() {
        return Err(Error::Command(format!(
            "nothing collected, {} failure(s)",
            report.failures.len()
        )));
    }
    Ok(())
}
