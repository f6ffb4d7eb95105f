//! Bitget funding workflows.
//!
//! Composes the asset and subaccount sections into the operations the wallet
//! dispatcher runs: collecting subaccount funds, resolving chain names,
//! withdrawing and following withdrawals up. Workflows that return `Option`
//! or `bool` fail closed: the error is logged and a sentinel returned, so a
//! batch over many wallets keeps going past a single failure.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::adapter::outbound::bitget::dto::{ChainInfo, Currency, Withdrawal};
use crate::adapter::outbound::bitget::{
    BitgetClient, BitgetConfig, TransferRequest, WithdrawalQuery, WithdrawalRequest,
};
use crate::domain::{normalize_chain, to_wire};
use crate::error::ExchangeError;
use crate::port::{FundingExchange, WithdrawalProgress};

/// Page size for id lookups in withdrawal history.
const TX_LOOKUP_LIMIT: u32 = 50;

/// One subaccount balance moved to the master account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedTransfer {
    pub subaccount_id: String,
    pub amount: Decimal,
    pub transfer_id: u64,
}

/// A collection step that failed. `subaccount_id` is `None` when listing failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectFailure {
    pub subaccount_id: Option<String>,
    pub error: ExchangeError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectReport {
    pub transfers: Vec<CollectedTransfer>,
    pub failures: Vec<CollectFailure>,
}

impl CollectReport {
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

/// Funding workflows over one Bitget account.
///
/// Without a complete API key the actions exist unconfigured and every
/// workflow fails closed.
pub struct BitgetActions {
    client: Option<BitgetClient>,
}

impl BitgetActions {
    #[must_use]
    pub fn new(client: BitgetClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    #[must_use]
    pub fn unconfigured() -> Self {
        Self { client: None }
    }

    /// Connect when credentials are complete, otherwise stay unconfigured.
    pub async fn from_config(config: &BitgetConfig) -> Result<Self, ExchangeError> {
        if !config.credentials.is_complete() {
            warn!("Bitget credentials incomplete, funding workflows disabled");
            return Ok(Self::unconfigured());
        }
        Ok(Self::new(BitgetClient::connect(config).await?))
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub fn client(&self) -> Result<&BitgetClient, ExchangeError> {
        self.client.as_ref().ok_or(ExchangeError::Unconfigured)
    }

    /// True when no subaccount has an available balance of `symbol`.
    pub async fn all_balances_are_zero(&self, symbol: &str) -> Result<bool, ExchangeError> {
        let rows = self.client()?.subaccount.assets().await?;
        Ok(rows
            .iter()
            .flat_map(|row| &row.balances)
            .filter(|b| b.symbol.eq_ignore_ascii_case(symbol))
            .all(|b| b.available.is_zero()))
    }

    /// Available balance of `symbol` in the master spot account.
    pub async fn master_balance(&self, symbol: &str) -> Result<Decimal, ExchangeError> {
        let balances = self.client()?.asset.balances(Some(symbol)).await?;
        Ok(balances
            .values()
            .find(|b| b.symbol.eq_ignore_ascii_case(symbol))
            .map(|b| b.available)
            .unwrap_or_default())
    }

    /// Frozen `symbol` summed across subaccounts.
    pub async fn subaccounts_frozen_balance(&self, symbol: &str) -> Result<Decimal, ExchangeError> {
        let rows = self.client()?.subaccount.assets().await?;
        Ok(rows
            .iter()
            .flat_map(|row| &row.balances)
            .filter(|b| b.symbol.eq_ignore_ascii_case(symbol))
            .map(|b| b.frozen)
            .sum())
    }

    /// Move every positive available `symbol` balance of every subaccount to
    /// the master spot account. Continues past failed transfers.
    pub async fn collect_funds_from_subaccounts(&self, symbol: &str) -> CollectReport {
        let mut report = CollectReport::default();
        let client = match self.client() {
            Ok(client) => client,
            Err(err) => {
                error!(coin = %symbol, error = %err, "Cannot collect subaccount funds");
                report.failures.push(CollectFailure {
                    subaccount_id: None,
                    error: err,
                });
                return report;
            }
        };

        let rows = match client.subaccount.assets().await {
            Ok(rows) => rows,
            Err(err) => {
                error!(coin = %symbol, error = %err, "Failed to list subaccounts");
                report.failures.push(CollectFailure {
                    subaccount_id: None,
                    error: err,
                });
                return report;
            }
        };

        for row in rows {
            let amount: Decimal = row
                .balances
                .iter()
                .filter(|b| b.symbol.eq_ignore_ascii_case(symbol))
                .map(|b| b.available)
                .sum();
            if amount <= Decimal::ZERO {
                continue;
            }

            let request = TransferRequest::from_subaccount(symbol, amount, row.id.as_str());
            match client.asset.transfer(&request).await {
                Ok(transfer) => {
                    info!(
                        subaccount = %row.id,
                        coin = %symbol,
                        amount = %to_wire(amount),
                        "Collected subaccount funds"
                    );
                    report.transfers.push(CollectedTransfer {
                        subaccount_id: row.id,
                        amount,
                        transfer_id: transfer.transfer_id,
                    });
                }
                Err(err) => {
                    error!(subaccount = %row.id, coin = %symbol, error = %err, "Subaccount transfer failed");
                    report.failures.push(CollectFailure {
                        subaccount_id: Some(row.id),
                        error: err,
                    });
                }
            }
        }
        report
    }

    /// Coin metadata for `symbol`, matched case-insensitively.
    pub async fn currency(&self, symbol: &str) -> Result<Option<Currency>, ExchangeError> {
        let symbol = symbol.to_uppercase();
        let mut currencies = self.client()?.asset.currencies(Some(&symbol)).await?;
        if let Some(currency) = currencies.remove(&symbol) {
            return Ok(Some(currency));
        }
        Ok(currencies
            .into_values()
            .find(|c| c.symbol.eq_ignore_ascii_case(&symbol)))
    }

    async fn chain_info(&self, symbol: &str, chain: &str) -> Result<Option<ChainInfo>, ExchangeError> {
        if normalize_chain(chain).is_empty() {
            return Ok(None);
        }
        Ok(self
            .currency(symbol)
            .await?
            .and_then(|currency| currency.find_chain(chain).cloned()))
    }

    async fn logged_chain_info(&self, symbol: &str, chain: &str) -> Option<ChainInfo> {
        match self.chain_info(symbol, chain).await {
            Ok(Some(info)) => Some(info),
            Ok(None) => {
                debug!(coin = %symbol, chain = %chain, "No matching Bitget chain");
                None
            }
            Err(err) => {
                error!(coin = %symbol, chain = %chain, error = %err, "Failed to load Bitget coin info");
                None
            }
        }
    }

    /// Exact Bitget chain code for a user-supplied chain name.
    pub async fn resolve_chain_name(&self, symbol: &str, user_chain: &str) -> Option<String> {
        self.logged_chain_info(symbol, user_chain)
            .await
            .and_then(|info| info.canonical_name())
    }

    pub async fn minimal_withdrawal(&self, symbol: &str, chain: &str) -> Option<Decimal> {
        self.logged_chain_info(symbol, chain)
            .await
            .and_then(|info| info.min_withdrawal())
    }

    pub async fn withdrawal_fee(&self, symbol: &str, chain: &str) -> Option<Decimal> {
        self.logged_chain_info(symbol, chain)
            .await
            .and_then(|info| info.withdraw_fee())
    }

    /// Withdraw to an external address; returns the withdrawal id.
    ///
    /// `None` when the client is unconfigured, the chain cannot be resolved,
    /// the exchange rejects the request, or accepts it without an id.
    pub async fn withdraw(
        &self,
        to_address: &str,
        amount: Decimal,
        symbol: &str,
        chain: &str,
    ) -> Option<String> {
        let client = match self.client() {
            Ok(client) => client,
            Err(err) => {
                error!(address = %to_address, error = %err, "Failed to withdraw from Bitget");
                return None;
            }
        };

        let Some(resolved) = self.resolve_chain_name(symbol, chain).await else {
            error!(
                address = %to_address,
                coin = %symbol,
                chain = %chain,
                "Failed to withdraw from Bitget: cannot resolve chain name"
            );
            return None;
        };

        info!(
            address = %to_address,
            coin = %symbol,
            chain = %resolved,
            amount = %to_wire(amount),
            "Bitget withdraw"
        );
        let request = WithdrawalRequest::on_chain(symbol, amount, to_address, resolved.as_str());
        let receipt = match client.asset.withdraw(&request).await {
            Ok(receipt) => receipt,
            Err(err) => {
                error!(
                    address = %to_address,
                    code = err.code().unwrap_or("-"),
                    error = %err,
                    "Bitget withdraw failed"
                );
                return None;
            }
        };

        match receipt.id() {
            Some(id) => Some(id),
            None => {
                error!(
                    address = %to_address,
                    response = %serde_json::Value::Object(receipt.raw().clone()),
                    "Bitget accepted the withdrawal but returned no id"
                );
                None
            }
        }
    }

    /// State of the latest withdrawal of `symbol` to `address` on `chain`.
    ///
    /// Records are scanned newest first; the first one matching both the
    /// address (case-insensitive) and the chain (normalized) decides.
    pub async fn withdrawal_progress(
        &self,
        symbol: &str,
        address: &str,
        chain: &str,
        before: Option<i64>,
    ) -> Result<WithdrawalProgress, ExchangeError> {
        let query = WithdrawalQuery {
            symbol: Some(symbol.to_string()),
            before,
            ..WithdrawalQuery::default()
        };
        let history = self.client()?.asset.withdrawal_history(&query).await?;

        let mut records: Vec<Withdrawal> = history.into_values().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));

        let want_chain = normalize_chain(chain);
        let latest = records.into_iter().find(|record| {
            record
                .to
                .as_deref()
                .is_some_and(|to| to.eq_ignore_ascii_case(address))
                && record
                    .chain
                    .as_deref()
                    .is_some_and(|c| !want_chain.is_empty() && normalize_chain(c) == want_chain)
        });

        Ok(match latest {
            Some(record) if record.status.is_terminal_success() => WithdrawalProgress::Complete,
            Some(record) => WithdrawalProgress::Pending(record.status),
            None => WithdrawalProgress::NotFound,
        })
    }

    /// True only when the latest matching withdrawal reached a terminal
    /// success state. Pending, missing and failed lookups are all `false`;
    /// use [`Self::withdrawal_progress`] to tell them apart.
    pub async fn check_withdrawal_status(
        &self,
        symbol: &str,
        address: &str,
        chain: &str,
        before: Option<i64>,
    ) -> bool {
        match self.withdrawal_progress(symbol, address, chain, before).await {
            Ok(progress) => {
                debug!(address = %address, chain = %chain, progress = ?progress, "Withdrawal status");
                progress.is_complete()
            }
            Err(err) => {
                error!(address = %address, chain = %chain, error = %err, "Failed to check withdrawal status");
                false
            }
        }
    }

    /// Transaction hash of a withdrawal known by order id, withdrawal id or
    /// client order id.
    ///
    /// Numeric ids are tried as order id and withdrawal id before the client
    /// order id lookup. A failed lookup moves on to the next one.
    pub async fn try_to_get_tx_hash(&self, id: &str) -> Option<String> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        let client = match self.client() {
            Ok(client) => client,
            Err(err) => {
                error!(id = %id, error = %err, "Cannot look up withdrawal");
                return None;
            }
        };

        let base = WithdrawalQuery {
            limit: TX_LOOKUP_LIMIT,
            ..WithdrawalQuery::default()
        };
        let mut queries = Vec::with_capacity(3);
        if id.chars().all(|c| c.is_ascii_digit()) {
            queries.push(WithdrawalQuery {
                order_id: Some(id.to_string()),
                ..base.clone()
            });
            queries.push(WithdrawalQuery {
                withdrawal_id: Some(id.to_string()),
                ..base.clone()
            });
        }
        queries.push(WithdrawalQuery {
            client_oid: Some(id.to_string()),
            ..base
        });

        for query in &queries {
            let history = match client.asset.withdrawal_history(query).await {
                Ok(history) => history,
                Err(err) => {
                    warn!(id = %id, error = %err, "Withdrawal lookup failed");
                    continue;
                }
            };
            let hash = history
                .values()
                .filter(|record| record.is_identified_by(id))
                .find_map(|record| record.tx_hash.clone());
            if hash.is_some() {
                return hash;
            }
        }
        None
    }
}

#[async_trait]
impl FundingExchange for BitgetActions {
    async fn withdraw(
        &self,
        address: &str,
        amount: Decimal,
        symbol: &str,
        chain: &str,
    ) -> Option<String> {
        Self::withdraw(self, address, amount, symbol, chain).await
    }

    async fn check_withdrawal_status(
        &self,
        symbol: &str,
        address: &str,
        chain: &str,
        before: Option<i64>,
    ) -> bool {
        Self::check_withdrawal_status(self, symbol, address, chain, before).await
    }

    async fn transaction_hash(&self, withdrawal_id: &str) -> Option<String> {
        self.try_to_get_tx_hash(withdrawal_id).await
    }

    fn exchange_name(&self) -> &'static str {
        "Bitget"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn unconfigured_actions_fail_closed() {
        let actions = BitgetActions::unconfigured();
        assert!(!actions.is_configured());
        assert_eq!(actions.withdraw("0xabc", dec!(0.01), "ETH", "Optimism").await, None);
        assert!(!actions.check_withdrawal_status("ETH", "0xabc", "Optimism", None).await);
        assert_eq!(actions.try_to_get_tx_hash("123").await, None);
        assert_eq!(actions.resolve_chain_name("ETH", "Optimism").await, None);
        assert!(matches!(
            actions.master_balance("ETH").await,
            Err(ExchangeError::Unconfigured)
        ));

        let report = actions.collect_funds_from_subaccounts("ETH").await;
        assert!(report.transfers.is_empty());
        assert_eq!(report.failures.len(), 1);
    }

    #[tokio::test]
    async fn incomplete_credentials_leave_actions_unconfigured() {
        let config = BitgetConfig::default();
        let actions = BitgetActions::from_config(&config).await.expect("actions");
        assert!(!actions.is_configured());
    }

    #[test]
    fn report_total_sums_transfers() {
        let report = CollectReport {
            transfers: vec![
                CollectedTransfer {
                    subaccount_id: "1".into(),
                    amount: dec!(1.5),
                    transfer_id: 1,
                },
                CollectedTransfer {
                    subaccount_id: "2".into(),
                    amount: dec!(2.5),
                    transfer_id: 2,
                },
            ],
            failures: Vec::new(),
        };
        assert_eq!(report.total(), dec!(4.0));
    }
}
