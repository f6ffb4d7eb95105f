//! Withdrawal records and the receipt returned when issuing one.

use rust_decimal::Decimal;

use super::fields::{
    first_abs_decimal, first_decimal, first_numeric_id, first_seconds, first_string,
    scalar_string, Document,
};
use crate::domain::{Status, TransactionType};

/// Keys a withdrawal history record may be indexed by, most specific first.
pub(crate) const HISTORY_KEY_ALIASES: &[&str] =
    &["id", "withdrawalId", "wdId", "orderId", "clientOid", "bizId"];

/// Keys that identify a withdrawal when matching a record to a known id.
const IDENTIFIER_KEYS: &[&str] = &["wdId", "withdrawalId", "orderId", "clientOid", "bizId", "id"];

/// Where Bitget puts the on-chain transaction hash, by API version.
pub(crate) const TX_HASH_KEYS: &[&str] = &[
    "txId",
    "txHash",
    "hash",
    "transactionHash",
    "txid",
    "chainTxHash",
    "hashId",
    "tx_id",
    "tradeId",
];

/// Explicit withdrawal ids before generic client ids. `id` holds a bare
/// scalar `data` payload.
const RECEIPT_ID_KEYS: &[&str] = &[
    "withdrawalId",
    "wdId",
    "orderId",
    "clientOid",
    "clientId",
    "id",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Withdrawal {
    pub id: u64,
    pub order_id: Option<String>,
    pub client_oid: Option<String>,
    pub symbol: Option<String>,
    pub chain: Option<String>,
    pub amount: Decimal,
    pub fee: Decimal,
    pub fee_coin: Option<String>,
    pub from: Option<String>,
    pub area_code_from: Option<String>,
    pub to: Option<String>,
    pub area_code_to: Option<String>,
    pub tx_hash: Option<String>,
    /// `None` for records without a known `dest`.
    pub destination: Option<TransactionType>,
    pub status: Status,
    /// Creation time in seconds.
    pub timestamp: i64,
    pub tag: Option<String>,
    pub memo: Option<String>,
    raw: Document,
}

impl Withdrawal {
    pub fn from_raw(raw: &Document) -> Self {
        Self {
            id: first_numeric_id(raw, &["id", "withdrawalId", "wdId", "orderId"]).unwrap_or_default(),
            order_id: first_string(raw, &["orderId"]),
            client_oid: first_string(raw, &["clientOid", "clientId"]),
            symbol: first_string(raw, &["coin", "ccy"]),
            chain: first_string(raw, &["chain"]),
            amount: first_decimal(raw, &["size", "amt", "amount"]).unwrap_or_default(),
            fee: first_abs_decimal(raw, &["fee"]).unwrap_or_default(),
            fee_coin: first_string(raw, &["feeCcy", "feeCoin"]),
            from: first_string(raw, &["from", "fromAddress"]),
            area_code_from: first_string(raw, &["areaCodeFrom"]),
            to: first_string(raw, &["to", "toAddress", "address"]),
            area_code_to: first_string(raw, &["areaCodeTo"]),
            tx_hash: first_string(raw, TX_HASH_KEYS),
            destination: first_string(raw, &["dest", "transferType"])
                .and_then(|dest| TransactionType::from_state(&dest)),
            status: Status::from_raw(&first_string(raw, &["status", "state"]).unwrap_or_default()),
            timestamp: first_seconds(raw, &["ts", "cTime", "createTime"]),
            tag: first_string(raw, &["tag"]),
            memo: first_string(raw, &["memo"]),
            raw: raw.clone(),
        }
    }

    /// Key a raw history record is indexed under.
    ///
    /// `None` when the record carries no usable identifier at all.
    pub fn history_key(raw: &Document) -> Option<u64> {
        first_numeric_id(raw, HISTORY_KEY_ALIASES)
    }

    /// True when any identifier on the record equals `id`.
    pub fn is_identified_by(&self, id: &str) -> bool {
        IDENTIFIER_KEYS
            .iter()
            .filter_map(|key| self.raw.get(*key).and_then(scalar_string))
            .any(|value| value == id)
            || self.client_oid.as_deref() == Some(id)
    }

    pub fn raw(&self) -> &Document {
        &self.raw
    }
}

/// Response to issuing a withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct WithdrawalReceipt {
    pub withdrawal_id: Option<String>,
    pub order_id: Option<String>,
    pub client_oid: Option<String>,
    pub symbol: Option<String>,
    pub chain: Option<String>,
    pub amount: Decimal,
    raw: Document,
}

impl WithdrawalReceipt {
    pub fn from_raw(raw: &Document) -> Self {
        Self {
            withdrawal_id: first_string(raw, &["withdrawalId", "wdId"]),
            order_id: first_string(raw, &["orderId"]),
            client_oid: first_string(raw, &["clientOid", "clientId"]),
            symbol: first_string(raw, &["coin", "ccy"]),
            chain: first_string(raw, &["chain"]),
            amount: first_decimal(raw, &["size", "amt"]).unwrap_or_default(),
            raw: raw.clone(),
        }
    }

    /// Identifier to track this withdrawal by.
    ///
    /// `None` means the exchange accepted the request without saying which
    /// withdrawal it created.
    pub fn id(&self) -> Option<String> {
        first_string(&self.raw, RECEIPT_ID_KEYS)
    }

    pub fn raw(&self) -> &Document {
        &self.raw
    }
}
