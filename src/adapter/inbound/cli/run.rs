//! Command dispatch.

use super::command::{CheckCommand, Cli, Commands};
use super::{balance, chain, check, collect, session, withdraw};
use crate::error::Result;

/// Run the parsed command to completion.
///
/// The config is only loaded by commands that need it; `check` commands
/// load and report on it themselves.
pub async fn execute(cli: &Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    let load = || session::load_config(config_path);

    match &cli.command {
        Commands::Balances(args) => balance::execute_balances(&load()?, args.symbol.as_deref()).await,
        Commands::Subaccounts(args) => {
            balance::execute_subaccounts(&load()?, args.symbol.as_deref()).await
        }
        Commands::Collect(args) => collect::execute_collect(&load()?, args.symbol.as_deref()).await,
        Commands::Chains(args) => chain::execute_chains(&load()?, args.symbol.as_deref()).await,
        Commands::Withdraw(args) => withdraw::execute_withdraw(&load()?, args).await,
        Commands::Dispatch(args) => withdraw::execute_dispatch(&load()?, args).await,
        Commands::Status(args) => withdraw::execute_status(&load()?, args).await,
        Commands::TxHash(args) => withdraw::execute_tx_hash(&load()?, &args.id).await,
        Commands::Check(CheckCommand::Config) => check::config::execute_config(config_path),
        Commands::Check(CheckCommand::Proxy) => check::connection::execute_proxy(config_path).await,
        Commands::Check(CheckCommand::Endpoint) => {
            check::connection::execute_endpoint(config_path).await
        }
    }
}
