//! Spot wallet section: coins, balances, deposit and withdrawal history,
//! withdrawals and internal transfers.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};

use super::dto::deposit::ID_KEYS as DEPOSIT_ID_KEYS;
use super::dto::fields::{data_rows, first_numeric_id, first_string, scalar_string};
use super::dto::{Balance, Currency, Deposit, Document, Transfer, Withdrawal, WithdrawalReceipt};
use super::signing::Params;
use super::transport::{envelope_data, Transport};
use crate::domain::{to_wire, AccountType, Status, TransactionType, TransferType};
use crate::error::ExchangeError;

const COINS_PATH: &str = "/api/v2/spot/public/coins";
const ASSETS_PATH: &str = "/api/v2/spot/account/assets";
const ACCOUNT_INFO_PATH: &str = "/api/v2/spot/account/info";
const DEPOSIT_RECORDS_PATH: &str = "/api/v2/spot/wallet/deposit-records";
const WITHDRAWAL_RECORDS_PATH: &str = "/api/v2/spot/wallet/withdrawal-records";
const WITHDRAWAL_PATH: &str = "/api/v2/spot/wallet/withdrawal";
const CANCEL_WITHDRAWAL_PATH: &str = "/api/v2/spot/wallet/cancel-withdrawal";
const TRANSFER_PATH: &str = "/api/v2/spot/wallet/transfer";
const SUBACCOUNT_TRANSFER_PATH: &str = "/api/v2/spot/wallet/subaccount-transfer";

/// Timestamps below this are seconds, at or above it milliseconds.
const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

const DEFAULT_HISTORY_LIMIT: u32 = 100;

/// Filters for [`Asset::deposit_history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositQuery {
    pub symbol: Option<String>,
    pub from_address: Option<String>,
    pub to_address: Option<String>,
    pub status: Option<Status>,
    /// Records after this time, seconds or milliseconds.
    pub after: Option<i64>,
    /// Records before this time, seconds or milliseconds.
    pub before: Option<i64>,
    pub limit: u32,
}

impl Default for DepositQuery {
    fn default() -> Self {
        Self {
            symbol: None,
            from_address: None,
            to_address: None,
            status: None,
            after: None,
            before: None,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl DepositQuery {
    fn params(&self) -> Params {
        Params::new()
            .with_opt("coin", self.symbol.as_deref())
            .with_opt("fromAddress", self.from_address.as_deref())
            .with_opt("toAddress", self.to_address.as_deref())
            .with_opt("state", self.status.as_ref().map(|s| s.state.as_str()))
            .with("limit", self.limit)
            .with_opt("startTime", self.after.map(to_millis))
            .with_opt("endTime", self.before.map(to_millis))
    }
}

/// Filters for [`Asset::withdrawal_history`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalQuery {
    pub symbol: Option<String>,
    pub withdrawal_id: Option<String>,
    pub client_oid: Option<String>,
    pub order_id: Option<String>,
    pub to_address: Option<String>,
    pub chain: Option<String>,
    pub status: Option<Status>,
    pub after: Option<i64>,
    pub before: Option<i64>,
    pub limit: u32,
}

impl Default for WithdrawalQuery {
    fn default() -> Self {
        Self {
            symbol: None,
            withdrawal_id: None,
            client_oid: None,
            order_id: None,
            to_address: None,
            chain: None,
            status: None,
            after: None,
            before: None,
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl WithdrawalQuery {
    fn params(&self) -> Params {
        Params::new()
            .with_opt("coin", self.symbol.as_deref())
            .with_opt("withdrawalId", self.withdrawal_id.as_deref())
            .with_opt("clientOid", self.client_oid.as_deref())
            .with_opt("orderId", self.order_id.as_deref())
            .with_opt("toAddress", self.to_address.as_deref())
            .with_opt("chain", self.chain.as_deref())
            .with_opt("state", self.status.as_ref().map(|s| s.state.as_str()))
            .with("pageSize", self.limit)
            .with("limit", self.limit)
            .with_opt("startTime", self.after.map(to_millis))
            .with_opt("endTime", self.before.map(to_millis))
    }
}

/// An on-chain (or internal) withdrawal to issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub symbol: String,
    pub amount: Decimal,
    pub address: String,
    /// Exact chain code as listed by `/api/v2/spot/public/coins`.
    pub chain: String,
    pub transaction_type: TransactionType,
    pub fee: Option<Decimal>,
    pub client_oid: Option<String>,
}

impl WithdrawalRequest {
    pub fn on_chain(
        symbol: impl Into<String>,
        amount: Decimal,
        address: impl Into<String>,
        chain: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            address: address.into(),
            chain: chain.into(),
            transaction_type: TransactionType::OnChain,
            fee: None,
            client_oid: None,
        }
    }

    fn params(&self) -> Params {
        Params::new()
            .with("coin", &self.symbol)
            .with("address", &self.address)
            .with("chain", &self.chain)
            .with("size", to_wire(self.amount))
            .with("transferType", self.transaction_type.state())
            .with_opt("fee", self.fee.filter(|fee| !fee.is_zero()).map(to_wire))
            .with_opt("clientOid", self.client_oid.as_deref())
    }
}

/// An internal transfer between account types or from a subaccount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub symbol: String,
    pub amount: Decimal,
    pub from: AccountType,
    pub to: AccountType,
    /// When set, funds move from this subaccount to the master spot account.
    pub subaccount_id: Option<String>,
    pub transfer_type: TransferType,
    pub client_oid: Option<String>,
}

impl TransferRequest {
    /// Move `amount` between two account types of the master account.
    pub fn within_account(
        symbol: impl Into<String>,
        amount: Decimal,
        from: AccountType,
        to: AccountType,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            from,
            to,
            subaccount_id: None,
            transfer_type: TransferType::WithinAccount,
            client_oid: None,
        }
    }

    /// Move `amount` from a subaccount's spot wallet to the master spot wallet.
    pub fn from_subaccount(
        symbol: impl Into<String>,
        amount: Decimal,
        subaccount_id: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            from: AccountType::Spot,
            to: AccountType::Spot,
            subaccount_id: Some(subaccount_id.into()),
            transfer_type: TransferType::SubToMaster,
            client_oid: None,
        }
    }
}

/// Client for the spot wallet section.
pub struct Asset {
    transport: Arc<Transport>,
    master_uid: Mutex<Option<String>>,
}

impl Asset {
    #[must_use]
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            master_uid: Mutex::new(None),
        }
    }

    /// Coin metadata keyed by symbol. `symbol` may be a comma-separated list.
    pub async fn currencies(
        &self,
        symbol: Option<&str>,
    ) -> Result<BTreeMap<String, Currency>, ExchangeError> {
        let params = Params::new().with_opt("coin", symbol);
        let envelope = self.transport.get(COINS_PATH, &params).await?;

        let currencies: BTreeMap<String, Currency> = data_rows(envelope_data(&envelope), &[])
            .into_iter()
            .map(Currency::from_raw)
            .filter(|currency| !currency.symbol.is_empty())
            .map(|currency| (currency.symbol.clone(), currency))
            .collect();
        debug!(count = currencies.len(), "Fetched Bitget coins");
        Ok(currencies)
    }

    /// Master account spot balances keyed by symbol.
    pub async fn balances(
        &self,
        symbol: Option<&str>,
    ) -> Result<BTreeMap<String, Balance>, ExchangeError> {
        let params = Params::new().with_opt("coin", symbol);
        let envelope = self.transport.get(ASSETS_PATH, &params).await?;

        Ok(data_rows(envelope_data(&envelope), &["assets", "details", "assetList"])
            .into_iter()
            .filter(|row| Balance::symbol_of(row).is_some())
            .map(Balance::from_raw)
            .map(|balance| (balance.symbol.clone(), balance))
            .collect())
    }

    /// Deposit records keyed by numeric id; records without an id are skipped.
    pub async fn deposit_history(
        &self,
        query: &DepositQuery,
    ) -> Result<BTreeMap<u64, Deposit>, ExchangeError> {
        let envelope = self
            .transport
            .get(DEPOSIT_RECORDS_PATH, &query.params())
            .await?;

        Ok(data_rows(envelope_data(&envelope), &[])
            .into_iter()
            .filter_map(|row| {
                first_numeric_id(row, DEPOSIT_ID_KEYS).map(|key| (key, Deposit::from_raw(row)))
            })
            .collect())
    }

    /// Withdrawal records keyed by numeric id; records without an id are skipped.
    pub async fn withdrawal_history(
        &self,
        query: &WithdrawalQuery,
    ) -> Result<BTreeMap<u64, Withdrawal>, ExchangeError> {
        let envelope = self
            .transport
            .get(WITHDRAWAL_RECORDS_PATH, &query.params())
            .await?;

        Ok(data_rows(envelope_data(&envelope), &[])
            .into_iter()
            .filter_map(|row| Withdrawal::history_key(row).map(|key| (key, Withdrawal::from_raw(row))))
            .collect())
    }

    /// Issue a withdrawal. Moves funds off the exchange.
    pub async fn withdraw(
        &self,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalReceipt, ExchangeError> {
        info!(
            coin = %request.symbol,
            chain = %request.chain,
            address = %request.address,
            amount = %request.amount,
            "Issuing Bitget withdrawal"
        );
        let envelope = self
            .transport
            .post(WITHDRAWAL_PATH, &request.params())
            .await?;
        Ok(WithdrawalReceipt::from_raw(&data_document(&envelope)))
    }

    /// Cancel a pending withdrawal; returns the confirmation Bitget sends back.
    pub async fn cancel_withdrawal(&self, withdrawal_id: &str) -> Result<String, ExchangeError> {
        let params = Params::new().with("withdrawalId", withdrawal_id);
        let envelope = self.transport.post(CANCEL_WITHDRAWAL_PATH, &params).await?;
        Ok(match envelope_data(&envelope) {
            Some(Value::Object(data)) => {
                first_string(data, &["withdrawalId", "result"]).unwrap_or_default()
            }
            Some(data) => scalar_string(data).unwrap_or_default(),
            None => String::new(),
        })
    }

    /// Internal transfer. A subaccount id redirects to the subaccount endpoint.
    pub async fn transfer(&self, request: &TransferRequest) -> Result<Transfer, ExchangeError> {
        let amount = to_wire(request.amount);
        let (path, params) = match &request.subaccount_id {
            Some(subaccount_id) => {
                let master_uid = self.master_uid().await?;
                let params = Params::new()
                    .with("coin", &request.symbol)
                    .with("amount", amount)
                    .with("fromType", AccountType::Spot.state())
                    .with("toType", AccountType::Spot.state())
                    .with("fromUserId", subaccount_id)
                    .with("toUserId", master_uid)
                    .with_opt("clientOid", request.client_oid.as_deref());
                (SUBACCOUNT_TRANSFER_PATH, params)
            }
            None => {
                let params = Params::new()
                    .with("coin", &request.symbol)
                    .with("amount", amount)
                    .with("fromType", request.from.state())
                    .with("toType", request.to.state())
                    .with("transferType", request.transfer_type.state())
                    .with_opt("clientOid", request.client_oid.as_deref());
                (TRANSFER_PATH, params)
            }
        };

        info!(
            coin = %request.symbol,
            amount = %request.amount,
            subaccount = request.subaccount_id.as_deref().unwrap_or("-"),
            "Bitget internal transfer"
        );
        let envelope = self.transport.post(path, &params).await?;
        Ok(Transfer::from_raw(&data_document(&envelope)))
    }

    /// User id of the master account, fetched once per client.
    pub async fn master_uid(&self) -> Result<String, ExchangeError> {
        if let Some(uid) = self.master_uid.lock().clone() {
            return Ok(uid);
        }

        let envelope = self.transport.get(ACCOUNT_INFO_PATH, &Params::new()).await?;
        let uid = match envelope_data(&envelope) {
            Some(Value::Object(data)) => first_string(data, &["userId"]),
            Some(Value::Array(rows)) => rows
                .first()
                .and_then(Value::as_object)
                .and_then(|row| first_string(row, &["userId"])),
            _ => None,
        }
        .ok_or_else(|| ExchangeError::Protocol("account info has no userId".into()))?;

        debug!(uid = %uid, "Resolved Bitget master uid");
        *self.master_uid.lock() = Some(uid.clone());
        Ok(uid)
    }
}

/// `data` as an object. Scalars are wrapped under `id`.
fn data_document(envelope: &Document) -> Document {
    match envelope_data(envelope) {
        Some(Value::Object(data)) => data.clone(),
        Some(Value::Array(rows)) => rows
            .first()
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        Some(scalar) => {
            let mut doc = Document::new();
            doc.insert("id".into(), scalar.clone());
            doc
        }
        None => Document::new(),
    }
}

/// Milliseconds from a timestamp in seconds or milliseconds.
#[must_use]
pub fn to_millis(ts: i64) -> i64 {
    if ts >= MILLIS_THRESHOLD {
        ts
    } else {
        ts.saturating_mul(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn seconds_become_milliseconds() {
        assert_eq!(to_millis(1_700_000_000), 1_700_000_000_000);
        assert_eq!(to_millis(1_700_000_000_000), 1_700_000_000_000);
    }

    #[test]
    fn withdrawal_body_sends_amounts_as_strings() {
        let mut request = WithdrawalRequest::on_chain("ETH", dec!(0.0150), "0xabc", "Optimism");
        request.client_oid = Some("cx-1".into());
        let body: Value = serde_json::from_str(&request.params().json_body()).expect("json");
        assert_eq!(
            body,
            json!({
                "coin": "ETH",
                "address": "0xabc",
                "chain": "Optimism",
                "size": "0.015",
                "transferType": "on_chain",
                "clientOid": "cx-1"
            })
        );
    }

    #[test]
    fn history_queries_skip_missing_filters() {
        let query = WithdrawalQuery {
            symbol: Some("ETH".into()),
            before: Some(1_700_000_000),
            limit: 50,
            ..WithdrawalQuery::default()
        };
        assert_eq!(
            query.params().query_string(),
            "coin=ETH&pageSize=50&limit=50&endTime=1700000000000"
        );

        let deposits = DepositQuery::default();
        assert_eq!(deposits.params().query_string(), "limit=100");
    }

    #[test]
    fn scalar_data_is_wrapped_as_id() {
        let envelope = json!({"code": "00000", "data": "12345"});
        let doc = data_document(envelope.as_object().expect("object"));
        assert_eq!(doc.get("id"), Some(&json!("12345")));
    }

    #[test]
    fn subaccount_transfer_defaults() {
        let request = TransferRequest::from_subaccount("ETH", dec!(2.5), "222");
        assert_eq!(request.subaccount_id.as_deref(), Some("222"));
        assert_eq!(request.from, AccountType::Spot);
        assert_eq!(request.to, AccountType::Spot);
    }
}
