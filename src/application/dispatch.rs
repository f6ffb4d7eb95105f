//! Withdrawals from the exchange to wallets.

use std::time::Duration;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::domain::money::round_down;
use crate::domain::{to_wire, Wallet};
use crate::infrastructure::config::withdrawal::WithdrawalConfig;
use crate::port::FundingExchange;

/// Decimal places kept on randomized withdrawal amounts.
const AMOUNT_DECIMALS: u32 = 6;

/// One withdrawal to send: coin, user chain name and amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalPlan {
    pub symbol: String,
    pub chain: String,
    pub amount: Decimal,
}

impl WithdrawalPlan {
    /// Pick a configured chain and an amount in `[amount_min, amount_max]`.
    ///
    /// `None` when no chain is configured.
    pub fn pick<R: Rng + ?Sized>(config: &WithdrawalConfig, rng: &mut R) -> Option<Self> {
        let chains: Vec<&String> = config
            .chains
            .iter()
            .filter(|chain| !chain.trim().is_empty())
            .collect();
        if chains.is_empty() {
            return None;
        }
        let chain = chains[rng.gen_range(0..chains.len())];

        let (min, max) = (config.amount_min, config.amount_max);
        let amount = if max > min {
            let fraction = Decimal::new(rng.gen_range(0..=1_000_000), 6);
            let amount = round_down(min + (max - min) * fraction, AMOUNT_DECIMALS);
            amount.max(round_down(min, AMOUNT_DECIMALS))
        } else {
            round_down(min, AMOUNT_DECIMALS)
        };

        Some(Self {
            symbol: config.token.clone(),
            chain: chain.clone(),
            amount,
        })
    }
}

/// Pause range after a successful withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl DelayRange {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            min_secs: 0,
            max_secs: 0,
        }
    }

    #[must_use]
    pub fn from_config(config: &WithdrawalConfig) -> Self {
        Self {
            min_secs: config.delay_min_secs,
            max_secs: config.delay_max_secs,
        }
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let (lo, hi) = (self.min_secs.min(self.max_secs), self.min_secs.max(self.max_secs));
        Duration::from_secs(rng.gen_range(lo..=hi))
    }
}

/// Withdraw `plan` to `wallet` and pause before returning.
///
/// Returns the withdrawal id, or `None` when the exchange did not confirm one.
pub async fn withdraw_to_wallet(
    exchange: &dyn FundingExchange,
    wallet: &Wallet,
    plan: &WithdrawalPlan,
    delay: DelayRange,
) -> Option<String> {
    info!(
        wallet = %wallet,
        exchange = exchange.exchange_name(),
        coin = %plan.symbol,
        chain = %plan.chain,
        amount = %to_wire(plan.amount),
        "Trying to withdraw"
    );

    let Some(id) = exchange
        .withdraw(&wallet.address, plan.amount, &plan.symbol, &plan.chain)
        .await
    else {
        error!(wallet = %wallet, chain = %plan.chain, "Withdrawal failed");
        return None;
    };

    info!(wallet = %wallet, id = %id, chain = %plan.chain, "Withdrawal issued");
    let pause = delay.pick(&mut rand::thread_rng());
    if !pause.is_zero() {
        debug!(wallet = %wallet, secs = pause.as_secs(), "Sleeping between withdrawals");
        tokio::time::sleep(pause).await;
    }
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal_macros::dec;

    struct RecordingExchange {
        reply: Option<String>,
        calls: Mutex<Vec<(String, Decimal, String, String)>>,
    }

    #[async_trait]
    impl FundingExchange for RecordingExchange {
        async fn withdraw(
            &self,
            address: &str,
            amount: Decimal,
            symbol: &str,
            chain: &str,
        ) -> Option<String> {
            self.calls
                .lock()
                .push((address.into(), amount, symbol.into(), chain.into()));
            self.reply.clone()
        }

        async fn check_withdrawal_status(
            &self,
            _symbol: &str,
            _address: &str,
            _chain: &str,
            _before: Option<i64>,
        ) -> bool {
            false
        }

        async fn transaction_hash(&self, _withdrawal_id: &str) -> Option<String> {
            None
        }

        fn exchange_name(&self) -> &'static str {
            "Recording"
        }
    }

    fn config() -> WithdrawalConfig {
        WithdrawalConfig {
            chains: vec!["Arbitrum One".into(), "Optimism".into()],
            amount_min: dec!(0.004),
            amount_max: dec!(0.006),
            ..WithdrawalConfig::default()
        }
    }

    #[test]
    fn plan_stays_within_configured_range() {
        let config = config();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let plan = WithdrawalPlan::pick(&config, &mut rng).expect("plan");
            assert!(plan.amount >= dec!(0.004) && plan.amount <= dec!(0.006));
            assert!(plan.amount.scale() <= AMOUNT_DECIMALS);
            assert!(config.chains.contains(&plan.chain));
            assert_eq!(plan.symbol, "ETH");
        }
    }

    #[test]
    fn fixed_amount_when_range_is_a_point() {
        let config = WithdrawalConfig {
            amount_min: dec!(0.01),
            amount_max: dec!(0.01),
            ..WithdrawalConfig::default()
        };
        let plan = WithdrawalPlan::pick(&config, &mut StdRng::seed_from_u64(1)).expect("plan");
        assert_eq!(plan.amount, dec!(0.01));
    }

    #[test]
    fn no_chains_means_no_plan() {
        let config = WithdrawalConfig {
            chains: vec![" ".into()],
            ..WithdrawalConfig::default()
        };
        assert!(WithdrawalPlan::pick(&config, &mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn delay_is_within_bounds() {
        let delay = DelayRange {
            min_secs: 180,
            max_secs: 360,
        };
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let secs = delay.pick(&mut rng).as_secs();
            assert!((180..=360).contains(&secs));
        }
        assert_eq!(DelayRange::none().pick(&mut rng), Duration::ZERO);
    }

    #[tokio::test]
    async fn successful_withdrawal_returns_id() {
        let exchange = RecordingExchange {
            reply: Some("900".into()),
            calls: Mutex::new(Vec::new()),
        };
        let wallet = Wallet::new(1, "0xabc");
        let plan = WithdrawalPlan {
            symbol: "ETH".into(),
            chain: "Optimism".into(),
            amount: dec!(0.005),
        };
        let id = withdraw_to_wallet(&exchange, &wallet, &plan, DelayRange::none()).await;
        assert_eq!(id.as_deref(), Some("900"));
        assert_eq!(
            exchange.calls.lock().as_slice(),
            &[("0xabc".to_string(), dec!(0.005), "ETH".to_string(), "Optimism".to_string())]
        );
    }

    #[tokio::test]
    async fn failed_withdrawal_returns_none_without_sleeping() {
        let exchange = RecordingExchange {
            reply: None,
            calls: Mutex::new(Vec::new()),
        };
        let wallet = Wallet::new(2, "0xdef");
        let plan = WithdrawalPlan {
            symbol: "ETH".into(),
            chain: "Optimism".into(),
            amount: dec!(0.005),
        };
        let delay = DelayRange {
            min_secs: 100,
            max_secs: 100,
        };
        let started = std::time::Instant::now();
        assert_eq!(withdraw_to_wallet(&exchange, &wallet, &plan, delay).await, None);
        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(exchange.calls.lock().len(), 1);
    }
}
