//! Coinferry - Bitget funding client.
//!
//! Signed access to the Bitget v2 REST API for moving funds between a master
//! account, its subaccounts and external wallets.
//!
//! # Architecture
//!
//! - **`adapter::outbound::bitget`** - Signing, transport, response models and
//!   the asset and subaccount sections of the API
//! - **`application`** - Funding workflows (`BitgetActions`) and wallet dispatch
//! - **`port`** - The `FundingExchange` trait the dispatcher consumes
//! - **`adapter::inbound::cli`** - The `coinferry` command-line interface
//!
//! # Modules
//!
//! - [`domain`] - Exchange vocabulary: chains, statuses, amounts, wallets
//! - [`error`] - Error types for the crate
//! - [`infrastructure`] - Configuration loading and logging setup
//!
//! # Example
//!
//! ```no_run
//! use coinferry::application::BitgetActions;
//! use coinferry::infrastructure::config::settings::Config;
//!
//! # async fn run() -> coinferry::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let actions = BitgetActions::from_config(&config.bitget).await?;
//! let report = actions.collect_funds_from_subaccounts("ETH").await;
//! println!("collected {}", report.total());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
