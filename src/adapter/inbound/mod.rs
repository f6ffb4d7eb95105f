//! Inbound adapters: how operators drive the workflows.

pub mod cli;
