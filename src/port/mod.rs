//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! - [`FundingExchange`] - withdrawals to wallets and their follow-up

pub mod outbound;

pub use outbound::exchange::{FundingExchange, WithdrawalProgress};
