//! Spot balance of a single coin.

use rust_decimal::Decimal;
use serde::Serialize;

use super::fields::{first_decimal, first_string, Document};

const SYMBOL_KEYS: &[&str] = &["coin", "ccy", "symbol", "currency"];
const AVAILABLE_KEYS: &[&str] = &["available", "availBal"];
const FROZEN_KEYS: &[&str] = &["frozen", "locked", "freeze", "frozenBal"];
const TOTAL_KEYS: &[&str] = &["balance", "total", "bal"];

/// Balance of one coin in a spot account.
///
/// Bitget reports at most two of the three amounts. The missing one is
/// derived: `total = available + frozen`, or `frozen = total - available`
/// when `total >= available`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub symbol: String,
    pub available: Decimal,
    pub frozen: Decimal,
    pub total: Decimal,
}

impl Balance {
    pub fn from_parts(
        symbol: impl Into<String>,
        available: Option<Decimal>,
        frozen: Option<Decimal>,
        total: Option<Decimal>,
    ) -> Self {
        let available = available.unwrap_or_default();
        let (frozen, total) = match (frozen, total) {
            (Some(frozen), Some(total)) => (frozen, total),
            (Some(frozen), None) => (frozen, available + frozen),
            (None, Some(total)) if total >= available => (total - available, total),
            (None, Some(total)) => (Decimal::ZERO, total),
            (None, None) => (Decimal::ZERO, available),
        };
        Self {
            symbol: symbol.into(),
            available,
            frozen,
            total,
        }
    }

    pub fn from_raw(obj: &Document) -> Self {
        Self::from_parts(
            first_string(obj, SYMBOL_KEYS).unwrap_or_default(),
            first_decimal(obj, AVAILABLE_KEYS),
            first_decimal(obj, FROZEN_KEYS),
            first_decimal(obj, TOTAL_KEYS),
        )
    }

    /// Coin symbol of a raw balance row, if it has one.
    pub fn symbol_of(obj: &Document) -> Option<String> {
        first_string(obj, SYMBOL_KEYS)
    }
}
