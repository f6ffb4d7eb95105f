//! Subaccount section.
//!
//! Bitget has no per-subaccount balance query for standard subaccounts, so
//! every read fetches all subaccount assets and filters client-side. Only
//! subaccounts holding a non-zero balance are listed by the exchange.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::dto::fields::data_rows;
use super::dto::{Balance, SubaccountAssets};
use super::signing::Params;
use super::transport::{envelope_data, Transport};
use crate::error::ExchangeError;

const SUBACCOUNT_ASSETS_PATH: &str = "/api/v2/spot/account/subaccount-assets";

pub struct Subaccount {
    transport: Arc<Transport>,
}

impl Subaccount {
    #[must_use]
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Every visible subaccount with its spot balances.
    pub async fn assets(&self) -> Result<Vec<SubaccountAssets>, ExchangeError> {
        let envelope = self
            .transport
            .get(SUBACCOUNT_ASSETS_PATH, &Params::new())
            .await?;
        let rows: Vec<SubaccountAssets> = data_rows(envelope_data(&envelope), &[])
            .into_iter()
            .filter_map(SubaccountAssets::from_raw)
            .collect();
        debug!(count = rows.len(), "Fetched Bitget subaccount assets");
        Ok(rows)
    }

    /// Ids of subaccounts holding a non-zero balance.
    pub async fn list(&self) -> Result<Vec<String>, ExchangeError> {
        Ok(self.assets().await?.into_iter().map(|row| row.id).collect())
    }

    /// Balances of one subaccount keyed by symbol, optionally one coin only.
    ///
    /// Empty when the subaccount is not listed.
    pub async fn asset_balances(
        &self,
        subaccount_id: &str,
        symbol: Option<&str>,
    ) -> Result<BTreeMap<String, Balance>, ExchangeError> {
        let rows = self.assets().await?;
        Ok(rows
            .into_iter()
            .find(|row| row.id == subaccount_id)
            .map(|row| filter_symbol(row.balances, symbol))
            .unwrap_or_default())
    }
}

/// Balances keyed by symbol, keeping only `symbol` (case-insensitive) when set.
pub(crate) fn filter_symbol(
    balances: Vec<Balance>,
    symbol: Option<&str>,
) -> BTreeMap<String, Balance> {
    balances
        .into_iter()
        .filter(|balance| symbol.map_or(true, |s| balance.symbol.eq_ignore_ascii_case(s)))
        .map(|balance| (balance.symbol.clone(), balance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn symbol_filter_ignores_case() {
        let balances = vec![
            Balance::from_parts("ETH", Some(dec!(1)), None, None),
            Balance::from_parts("USDT", Some(dec!(5)), None, None),
        ];
        let only_eth = filter_symbol(balances.clone(), Some("eth"));
        assert_eq!(only_eth.len(), 1);
        assert!(only_eth.contains_key("ETH"));
        assert_eq!(filter_symbol(balances, None).len(), 2);
    }
}
