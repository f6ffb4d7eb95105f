//! Coin metadata from `/api/v2/spot/public/coins`.

use rust_decimal::Decimal;
use serde_json::Value;

use super::fields::{first, first_bool, first_parsed_decimal, first_string, Document};
use crate::domain::chain::{chain_matches, normalize_chain};

/// Fields that may carry a chain's name, depending on API version.
const NAME_KEYS: &[&str] = &[
    "chain",
    "chainName",
    "network",
    "name",
    "symbol",
    "chainSymbol",
    "withdrawChain",
    "displayName",
];

/// Preferred order when picking the name to send back to the exchange.
const CANONICAL_KEYS: &[&str] = &[
    "chainName",
    "displayName",
    "withdrawChain",
    "chain",
    "network",
];

const MIN_WITHDRAW_KEYS: &[&str] = &["minWithdrawAmount", "minWithdraw", "minWd", "min", "minAmount"];

const FEE_KEYS: &[&str] = &[
    "withdrawFee",
    "wdFee",
    "chainFee",
    "fee",
    "networkFee",
    "minFee",
    "fixedFee",
];

const CHAIN_LIST_KEYS: &[&str] = &["chains", "networks", "chainList"];

/// One network a coin can move on.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainInfo {
    raw: Document,
}

impl ChainInfo {
    pub fn from_raw(raw: &Document) -> Self {
        Self { raw: raw.clone() }
    }

    /// Every name alias this entry carries, in alias order.
    pub fn names(&self) -> Vec<&str> {
        NAME_KEYS
            .iter()
            .filter_map(|key| self.raw.get(*key).and_then(Value::as_str))
            .filter(|name| !name.is_empty())
            .collect()
    }

    /// Name to pass as `chain` when withdrawing.
    pub fn canonical_name(&self) -> Option<String> {
        first_string(&self.raw, CANONICAL_KEYS)
            .or_else(|| self.names().first().map(|name| (*name).to_string()))
    }

    /// First minimum-withdrawal alias holding a parsable amount.
    pub fn min_withdrawal(&self) -> Option<Decimal> {
        first_parsed_decimal(&self.raw, MIN_WITHDRAW_KEYS)
    }

    /// First fee alias holding a parsable amount.
    pub fn withdraw_fee(&self) -> Option<Decimal> {
        first_parsed_decimal(&self.raw, FEE_KEYS)
    }

    pub fn withdrawable(&self) -> Option<bool> {
        first_bool(&self.raw, &["withdrawable"])
    }

    pub fn depositable(&self) -> Option<bool> {
        first_bool(&self.raw, &["rechargeable", "depositable"])
    }

    /// True when any of this entry's names matches a normalized wanted name.
    pub fn matches(&self, want: &str) -> bool {
        self.names()
            .into_iter()
            .any(|name| chain_matches(want, name))
    }

    pub fn raw(&self) -> &Document {
        &self.raw
    }
}

/// A coin and the networks it supports.
#[derive(Debug, Clone, PartialEq)]
pub struct Currency {
    pub symbol: String,
    pub chains: Vec<ChainInfo>,
    pub depositable: Option<bool>,
    pub withdrawable: Option<bool>,
    raw: Document,
}

impl Currency {
    pub fn from_raw(raw: &Document) -> Self {
        let chains: Vec<ChainInfo> = match first(raw, CHAIN_LIST_KEYS) {
            Some(Value::Array(entries)) => entries
                .iter()
                .filter_map(Value::as_object)
                .map(ChainInfo::from_raw)
                .collect(),
            _ => Vec::new(),
        };

        let any_chain = |f: fn(&ChainInfo) -> Option<bool>| {
            let flags: Vec<bool> = chains.iter().filter_map(f).collect();
            (!flags.is_empty()).then(|| flags.contains(&true))
        };

        Self {
            symbol: first_string(raw, &["coin", "ccy"]).unwrap_or_default(),
            depositable: first_bool(raw, &["depositable"])
                .or_else(|| any_chain(ChainInfo::depositable)),
            withdrawable: first_bool(raw, &["withdrawable"])
                .or_else(|| any_chain(ChainInfo::withdrawable)),
            chains,
            raw: raw.clone(),
        }
    }

    /// Find the chain entry a user-supplied name refers to.
    ///
    /// Matching ignores case and punctuation and accepts equality or
    /// containment in either direction. The first listed chain with any
    /// matching alias wins.
    pub fn find_chain(&self, user_chain: &str) -> Option<&ChainInfo> {
        let want = normalize_chain(user_chain);
        if want.is_empty() {
            return None;
        }
        self.chains.iter().find(|chain| chain.matches(&want))
    }

    pub fn raw(&self) -> &Document {
        &self.raw
    }
}
