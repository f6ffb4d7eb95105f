//! Internal transfer records.

use rust_decimal::Decimal;

use super::fields::{first_decimal, first_numeric_id, first_string, Document};
use crate::domain::AccountType;

#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    /// Exchange transfer id, `0` when the response carried none.
    pub transfer_id: u64,
    pub client_oid: Option<String>,
    pub symbol: Option<String>,
    pub from: Option<AccountType>,
    pub to: Option<AccountType>,
    pub amount: Decimal,
    raw: Document,
}

impl Transfer {
    pub fn from_raw(raw: &Document) -> Self {
        let account = |keys: &[&str]| first_string(raw, keys).and_then(|t| AccountType::from_state(&t));
        Self {
            transfer_id: first_numeric_id(raw, &["transferId", "transId", "id"]).unwrap_or_default(),
            client_oid: first_string(raw, &["clientOid", "clientId"]),
            symbol: first_string(raw, &["coin", "ccy"]),
            from: account(&["fromType", "from"]),
            to: account(&["toType", "to"]),
            amount: first_decimal(raw, &["size", "amt", "amount"]).unwrap_or_default(),
            raw: raw.clone(),
        }
    }

    pub fn raw(&self) -> &Document {
        &self.raw
    }
}
