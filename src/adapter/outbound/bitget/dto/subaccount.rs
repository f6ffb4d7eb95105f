//! Rows of `/api/v2/spot/account/subaccount-assets`.

use serde_json::Value;

use super::balance::Balance;
use super::fields::{first, first_string, Document};
use crate::domain::SubaccountType;

const ID_KEYS: &[&str] = &["subUid", "subAccountUid", "uid", "userId", "id"];
const ASSET_LIST_KEYS: &[&str] = &["assetsList", "assets"];
const TYPE_KEYS: &[&str] = &["type", "accountType", "accType"];

/// Balances held by one subaccount.
#[derive(Debug, Clone, PartialEq)]
pub struct SubaccountAssets {
    pub id: String,
    /// `None` when the row has no type or an unknown type code.
    pub kind: Option<SubaccountType>,
    pub balances: Vec<Balance>,
}

impl SubaccountAssets {
    /// Subaccount id of a raw row, if it has one.
    pub fn id_of(raw: &Document) -> Option<String> {
        first_string(raw, ID_KEYS)
    }

    /// `None` when the row carries no subaccount id.
    pub fn from_raw(raw: &Document) -> Option<Self> {
        let id = Self::id_of(raw)?;
        let balances = match first(raw, ASSET_LIST_KEYS) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_object)
                .filter(|item| Balance::symbol_of(item).is_some())
                .map(Balance::from_raw)
                .collect(),
            _ => Vec::new(),
        };
        let kind = first_string(raw, TYPE_KEYS).and_then(|code| SubaccountType::from_state(&code));
        Some(Self { id, kind, balances })
    }
}
