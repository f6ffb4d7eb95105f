//! Funding exchange port.
//!
//! The wallet dispatcher only needs to issue a withdrawal and follow it up;
//! it does not care which exchange or client sits behind it.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::Status;

/// Where a withdrawal to an address stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WithdrawalProgress {
    /// Latest matching record reached a terminal success state.
    Complete,
    /// Latest matching record exists but has not cleared.
    Pending(Status),
    /// No matching record before the cutoff.
    NotFound,
}

impl WithdrawalProgress {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Exchange that can send funds to wallets.
///
/// Every method fails closed: failures are logged by the implementation
/// and reported as `None` / `false`.
#[async_trait]
pub trait FundingExchange: Send + Sync {
    /// Withdraw `amount` of `symbol` to `address`; returns the withdrawal id.
    async fn withdraw(
        &self,
        address: &str,
        amount: Decimal,
        symbol: &str,
        chain: &str,
    ) -> Option<String>;

    /// True only when the latest matching withdrawal has cleared.
    async fn check_withdrawal_status(
        &self,
        symbol: &str,
        address: &str,
        chain: &str,
        before: Option<i64>,
    ) -> bool;

    /// On-chain hash of a withdrawal, once the exchange reports one.
    async fn transaction_hash(&self, withdrawal_id: &str) -> Option<String>;

    /// Exchange name for logs.
    fn exchange_name(&self) -> &'static str;
}
