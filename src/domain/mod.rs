//! Exchange vocabulary shared by the client, the workflows and the CLI.

pub mod chain;
pub mod money;
pub mod status;
pub mod wallet;

pub use chain::{normalize_chain, Chain};
pub use money::{to_wire, Amount};
pub use status::{AccountType, Status, SubaccountType, TransactionType, TransferType};
pub use wallet::Wallet;
