//! Canonical records decoded from Bitget payloads.
//!
//! Decoding never fails a whole record because an optional field is
//! malformed; identifiers and amounts are the only fields callers should rely
//! on, and those are parsed strictly.

pub mod balance;
pub mod currency;
pub mod deposit;
pub mod fields;
pub mod subaccount;
pub mod transfer;
pub mod withdrawal;

pub use balance::Balance;
pub use currency::{ChainInfo, Currency};
pub use deposit::Deposit;
pub use fields::Document;
pub use subaccount::SubaccountAssets;
pub use transfer::Transfer;
pub use withdrawal::{Withdrawal, WithdrawalReceipt};
