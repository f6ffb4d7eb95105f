//! Outbound adapters: exchanges the workflows call.

pub mod bitget;
