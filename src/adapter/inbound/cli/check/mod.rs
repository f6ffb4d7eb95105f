//! Configuration and connectivity diagnostics.

pub mod config;
pub mod connection;
