//! Application services (use cases).
//!
//! These services compose the Bitget adapter into funding workflows and
//! dispatch withdrawals to wallets.

pub mod actions;
pub mod dispatch;

pub use actions::{BitgetActions, CollectFailure, CollectReport, CollectedTransfer};
pub use dispatch::{withdraw_to_wallet, DelayRange, WithdrawalPlan};
