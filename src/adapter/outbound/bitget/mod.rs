//! Bitget v2 REST adapter.

pub mod asset;
pub mod client;
pub mod credentials;
pub mod dto;
pub mod proxy;
pub mod settings;
pub mod signing;
pub mod subaccount;
pub mod transport;

pub use asset::{Asset, DepositQuery, TransferRequest, WithdrawalQuery, WithdrawalRequest};
pub use client::BitgetClient;
pub use credentials::Credentials;
pub use settings::{BitgetConfig, BitgetHttpConfig};
pub use subaccount::Subaccount;
pub use transport::Transport;
