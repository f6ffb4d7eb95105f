//! CLI module graph.

pub mod balance;
pub mod chain;
pub mod check;
pub mod collect;
pub mod command;
pub mod output;
pub mod run;
pub mod session;
pub mod withdraw;
