//! Withdrawal commands: send, follow up and batch dispatch.

use serde::Serialize;

use crate::adapter::inbound::cli::command::{DispatchArgs, StatusArgs, WithdrawArgs};
use crate::adapter::inbound::cli::output::{self, Text, View};
use crate::adapter::inbound::cli::session;
use crate::application::{withdraw_to_wallet, DelayRange, WithdrawalPlan};
use crate::domain::{to_wire, Chain, Wallet};
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::port::WithdrawalProgress;

#[derive(Debug, Serialize)]
struct WithdrawalPreview {
    address: String,
    coin: String,
    amount: String,
    /// Chain code as Bitget lists it.
    chain: String,
    fee: Option<String>,
    minimum: Option<String>,
    below_minimum: bool,
}

impl View for WithdrawalPreview {
    const KIND: &'static str = "withdrawal_preview";

    fn render(&self, text: &mut Text) {
        text.title("Withdrawal");
        text.field("Address", &self.address);
        text.field("Amount", format!("{} {}", self.amount, self.coin));
        text.field("Chain", output::highlight(&self.chain));
        if let Some(fee) = &self.fee {
            text.field("Fee", format!("{fee} {}", self.coin));
        }
        if let Some(minimum) = &self.minimum {
            text.field("Minimum", format!("{minimum} {}", self.coin));
        }
        if self.below_minimum {
            text.warning("amount is below the minimal withdrawal for this chain");
        }
    }
}

#[derive(Debug, Serialize)]
struct WithdrawalIssued {
    /// Position in a dispatch batch; `None` for a single withdrawal.
    index: Option<u64>,
    address: String,
    id: Option<String>,
}

impl View for WithdrawalIssued {
    const KIND: &'static str = "withdrawal";

    fn render(&self, text: &mut Text) {
        let prefix = self.index.map(|i| format!("#{i} ")).unwrap_or_default();
        match &self.id {
            Some(id) => text.success(&format!("{prefix}withdrawal {} issued", output::highlight(id))),
            None => text.warning(&format!("{prefix}withdrawal to {} failed", self.address)),
        }
    }
}

#[derive(Debug, Serialize)]
struct PlannedWithdrawal {
    index: u64,
    address: String,
    coin: String,
    chain: String,
    amount: String,
}

#[derive(Debug, Serialize)]
struct DispatchPreview {
    withdrawals: Vec<PlannedWithdrawal>,
}

impl View for DispatchPreview {
    const KIND: &'static str = "dispatch_preview";

    fn render(&self, text: &mut Text) {
        text.title("Dispatch");
        for planned in &self.withdrawals {
            text.field(
                &format!("#{}", planned.index),
                format!(
                    "{} {} on {} to {}",
                    planned.amount, planned.coin, planned.chain, planned.address
                ),
            );
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusView {
    address: String,
    chain: String,
    coin: String,
    complete: bool,
    /// Raw Bitget state of a pending withdrawal.
    state: Option<String>,
}

impl View for StatusView {
    const KIND: &'static str = "withdrawal_status";

    fn render(&self, text: &mut Text) {
        text.title("Withdrawal Status");
        text.field("Address", &self.address);
        text.field("Chain", &self.chain);
        if self.complete {
            text.success("Withdrawal complete");
            return;
        }
        if let Some(state) = &self.state {
            text.field("Status", output::highlight(state));
        }
        text.warning("Withdrawal has not completed yet");
    }
}

#[derive(Debug, Serialize)]
struct TxHashView {
    withdrawal: String,
    hash: String,
}

impl View for TxHashView {
    const KIND: &'static str = "tx_hash";

    fn render(&self, text: &mut Text) {
        text.title("Transaction");
        text.field("Withdrawal", &self.withdrawal);
        text.field("Hash", output::highlight(&self.hash));
    }
}

/// Names of well-known chains, for when a chain name did not resolve.
fn known_chains_hint(chain: &str) -> Option<String> {
    if Chain::lookup(chain).is_some() {
        return None;
    }
    let names: Vec<&str> = Chain::ALL.iter().map(|c| c.display_name()).collect();
    Some(format!("common chain names: {}", names.join(", ")))
}

/// Preview a withdrawal, and send it when `--yes` is given.
pub async fn execute_withdraw(config: &Config, args: &WithdrawArgs) -> Result<()> {
    let symbol = session::symbol_or_default(args.symbol.as_deref(), config);
    let actions = session::connect(config).await?;

    let Some(chain) = actions.resolve_chain_name(&symbol, &args.chain).await else {
        if let Some(hint) = known_chains_hint(&args.chain) {
            output::hint(&hint);
        }
        return Err(Error::Command(format!(
            "{} is not a {symbol} chain on Bitget",
            args.chain
        )));
    };

    let minimum = actions.minimal_withdrawal(&symbol, &args.chain).await;
    output::emit(&WithdrawalPreview {
        address: args.address.clone(),
        coin: symbol.clone(),
        amount: to_wire(args.amount),
        chain,
        fee: actions.withdrawal_fee(&symbol, &args.chain).await.map(to_wire),
        minimum: minimum.map(to_wire),
        below_minimum: minimum.is_some_and(|min| args.amount < min),
    });

    if !args.yes {
        output::hint("re-run with --yes to send this withdrawal");
        return Ok(());
    }

    let plan = WithdrawalPlan {
        symbol,
        chain: args.chain.clone(),
        amount: args.amount,
    };
    let wallet = Wallet::new(0, &args.address);
    let id = withdraw_to_wallet(&actions, &wallet, &plan, DelayRange::none()).await;
    output::emit(&WithdrawalIssued {
        index: None,
        address: args.address.clone(),
        id: id.clone(),
    });
    if id.is_none() {
        return Err(Error::Command("withdrawal was not accepted, see logs".to_string()));
    }
    Ok(())
}

/// Randomized withdrawals to several addresses, paced by the configured delay.
pub async fn execute_dispatch(config: &Config, args: &DispatchArgs) -> Result<()> {
    let plans: Vec<(Wallet, WithdrawalPlan)> = {
        let mut rng = rand::thread_rng();
        args.addresses
            .iter()
            .zip(1u64..)
            .map(|(address, id)| {
                WithdrawalPlan::pick(&config.withdrawal, &mut rng)
                    .map(|plan| (Wallet::new(id, address), plan))
                    .ok_or(Error::Command("no withdrawal chains configured".to_string()))
            })
            .collect::<Result<_>>()?
    };

    output::emit(&DispatchPreview {
        withdrawals: plans
            .iter()
            .map(|(wallet, plan)| PlannedWithdrawal {
                index: wallet.id,
                address: wallet.address.clone(),
                coin: plan.symbol.clone(),
                chain: plan.chain.clone(),
                amount: to_wire(plan.amount),
            })
            .collect(),
    });
    if !args.yes {
        output::hint("re-run with --yes to send these withdrawals");
        return Ok(());
    }

    let actions = session::connect(config).await?;
    let delay = DelayRange::from_config(&config.withdrawal);
    let mut failed = 0usize;
    for (wallet, plan) in &plans {
        let id = withdraw_to_wallet(&actions, wallet, plan, delay).await;
        failed += usize::from(id.is_none());
        output::emit(&WithdrawalIssued {
            index: Some(wallet.id),
            address: wallet.address.clone(),
            id,
        });
    }

    if failed > 0 {
        return Err(Error::Command(format!(
            "{failed} of {} withdrawal(s) failed",
            plans.len()
        )));
    }
    Ok(())
}

/// Report the latest withdrawal to an address on a chain.
pub async fn execute_status(config: &Config, args: &StatusArgs) -> Result<()> {
    let symbol = session::symbol_or_default(args.symbol.as_deref(), config);
    let before = args.before.or(config.withdrawal.cutoff_timestamp);
    let actions = session::connect(config).await?;

    let progress = actions
        .withdrawal_progress(&symbol, &args.address, &args.chain, before)
        .await?;

    let (complete, state) = match progress {
        WithdrawalProgress::Complete => (true, None),
        WithdrawalProgress::Pending(status) => (false, Some(status.state)),
        WithdrawalProgress::NotFound => {
            return Err(Error::Command(format!(
                "no {symbol} withdrawal to {} on {}",
                args.address, args.chain
            )));
        }
    };
    output::emit(&StatusView {
        address: args.address.clone(),
        chain: args.chain.clone(),
        coin: symbol,
        complete,
        state,
    });
    Ok(())
}

/// Print the transaction hash of a withdrawal.
pub async fn execute_tx_hash(config: &Config, id: &str) -> Result<()> {
    let actions = session::connect(config).await?;
    let hash = actions
        .try_to_get_tx_hash(id)
        .await
        .ok_or_else(|| Error::Command(format!("no transaction hash for withdrawal {id}")))?;

    output::emit(&TxHashView {
        withdrawal: id.to_string(),
        hash,
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_only_for_unfamiliar_chain_names() {
        assert_eq!(known_chains_hint("arbitrum one"), None);
        let hint = known_chains_hint("arb1").expect("hint");
        assert!(hint.contains("Arbitrum One"));
        assert!(hint.contains("zkSync Era"));
    }
}
