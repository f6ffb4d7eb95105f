//! Deposit records from `/api/v2/spot/wallet/deposit-records`.

use rust_decimal::Decimal;

use super::fields::{
    first_i64, first_decimal, first_numeric_id, first_seconds, first_string, Document,
};
use crate::domain::Status;

pub(crate) const ID_KEYS: &[&str] = &["id", "depId", "orderId"];
const TX_HASH_KEYS: &[&str] = &["txId", "hash", "txHash", "transactionHash"];

#[derive(Debug, Clone, PartialEq)]
pub struct Deposit {
    pub id: u64,
    pub symbol: Option<String>,
    pub chain: Option<String>,
    pub amount: Decimal,
    pub from: Option<String>,
    pub area_code_from: Option<String>,
    pub to: Option<String>,
    pub tx_hash: Option<String>,
    /// Creation time in seconds.
    pub timestamp: i64,
    pub status: Status,
    pub from_withdrawal_id: Option<u64>,
    pub confirmations: Option<i64>,
    raw: Document,
}

impl Deposit {
    pub fn from_raw(raw: &Document) -> Self {
        Self {
            id: first_numeric_id(raw, ID_KEYS).unwrap_or_default(),
            symbol: first_string(raw, &["coin", "ccy"]),
            chain: first_string(raw, &["chain"]),
            amount: first_decimal(raw, &["size", "amt", "amount"]).unwrap_or_default(),
            from: first_string(raw, &["from", "fromAddress"]),
            area_code_from: first_string(raw, &["areaCodeFrom"]),
            to: first_string(raw, &["to", "toAddress", "address"]),
            tx_hash: first_string(raw, TX_HASH_KEYS),
            timestamp: first_seconds(raw, &["ts", "cTime", "createTime"]),
            status: Status::from_raw(&first_string(raw, &["status", "state"]).unwrap_or_default()),
            from_withdrawal_id: first_string(raw, &["fromWdId"]).and_then(|id| id.parse().ok()),
            confirmations: first_i64(raw, &["confirmations", "actualDepBlkConfirm"]),
            raw: raw.clone(),
        }
    }

    pub fn raw(&self) -> &Document {
        &self.raw
    }
}
