//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`exchange`] - `ScriptedExchange`, a local HTTP server replaying canned
//!   Bitget responses and recording requests.
//! - [`client`] - Builders wiring a `BitgetClient` to a scripted exchange.

pub mod client;
pub mod exchange;
