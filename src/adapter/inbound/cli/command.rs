//! Command-line interface definitions.
//!
//! Defines the CLI structure for coinferry using `clap`. Every command reads
//! the same configuration file; Bitget credentials always come from the
//! environment.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// Bitget funding operations: balances, subaccount collection and withdrawals
#[derive(Parser, Debug)]
#[command(name = "coinferry")]
#[command(version)]
pub struct Cli {
    /// Color output mode [auto, always, never]
    #[arg(
        long,
        global = true,
        default_value = "auto",
        hide_possible_values = true
    )]
    pub color: ColorChoice,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to the configuration file [default: ./config.toml when present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Color output mode for terminal rendering.
#[derive(Clone, Debug, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect automatically
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show master and subaccount balances of a coin
    Balances(SymbolArgs),

    /// List subaccounts and their spot assets
    Subaccounts(SubaccountsArgs),

    /// Move every subaccount balance of a coin to the master account
    Collect(SymbolArgs),

    /// List the chains a coin can be withdrawn on
    Chains(SymbolArgs),

    /// Withdraw to an external address
    Withdraw(WithdrawArgs),

    /// Withdraw a randomized configured amount to each address
    Dispatch(DispatchArgs),

    /// Check whether the latest withdrawal to an address has completed
    Status(StatusArgs),

    /// Look up the on-chain transaction hash of a withdrawal
    TxHash(TxHashArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `coinferry check`.
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate the configuration file and report credential state.
    Config,
    /// Verify the configured proxy and report its egress IP.
    Proxy,
    /// Check the entrypoint and fallbacks and report which one answers.
    Endpoint,
}

#[derive(Args, Debug)]
pub struct SymbolArgs {
    /// Coin symbol [default: withdrawal token from config]
    #[arg(short, long)]
    pub symbol: Option<String>,
}

#[derive(Args, Debug)]
pub struct SubaccountsArgs {
    /// Only show this coin
    #[arg(short, long)]
    pub symbol: Option<String>,
}

#[derive(Args, Debug)]
pub struct WithdrawArgs {
    /// Destination address
    #[arg(long)]
    pub address: String,

    /// Amount to withdraw
    #[arg(long)]
    pub amount: Decimal,

    /// Coin symbol [default: withdrawal token from config]
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Chain name as the user knows it, e.g. "Arbitrum One"
    #[arg(long)]
    pub chain: String,

    /// Send the withdrawal; without this flag only a preview is shown
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct DispatchArgs {
    /// Destination addresses, one withdrawal each
    #[arg(long = "address", required = true)]
    pub addresses: Vec<String>,

    /// Send the withdrawals; without this flag only the plan is shown
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Destination address of the withdrawal
    #[arg(long)]
    pub address: String,

    /// Chain the withdrawal was sent on
    #[arg(long)]
    pub chain: String,

    /// Coin symbol [default: withdrawal token from config]
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Only consider withdrawals before this unix timestamp (s or ms)
    #[arg(long)]
    pub before: Option<i64>,
}

#[derive(Args, Debug)]
pub struct TxHashArgs {
    /// Withdrawal id, order id or client order id
    #[arg(long)]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "coinferry");
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from(["coinferry", "--json", "-vv", "balances"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(cli.config.is_none());
        assert!(matches!(cli.color, ColorChoice::Auto));
    }

    #[test]
    fn test_parse_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["coinferry", "check", "config", "--config", "alt.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        assert!(matches!(cli.command, Commands::Check(CheckCommand::Config)));
    }

    #[test]
    fn test_parse_withdraw() {
        let cli = Cli::try_parse_from([
            "coinferry",
            "withdraw",
            "--address",
            "0xabc",
            "--amount",
            "0.015",
            "--chain",
            "Arbitrum One",
            "-s",
            "eth",
        ])
        .unwrap();
        let Commands::Withdraw(args) = cli.command else {
            panic!("expected withdraw");
        };
        assert_eq!(args.address, "0xabc");
        assert_eq!(args.amount, dec!(0.015));
        assert_eq!(args.chain, "Arbitrum One");
        assert_eq!(args.symbol.as_deref(), Some("eth"));
        assert!(!args.yes);
    }

    #[test]
    fn test_withdraw_requires_address() {
        let result = Cli::try_parse_from([
            "coinferry",
            "withdraw",
            "--amount",
            "1",
            "--chain",
            "Optimism",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_dispatch_collects_addresses() {
        let cli = Cli::try_parse_from([
            "coinferry",
            "dispatch",
            "--address",
            "0x1",
            "--address",
            "0x2",
        ])
        .unwrap();
        let Commands::Dispatch(args) = cli.command else {
            panic!("expected dispatch");
        };
        assert_eq!(args.addresses, vec!["0x1", "0x2"]);
        assert!(!args.yes);
        assert!(Cli::try_parse_from(["coinferry", "dispatch"]).is_err());
    }

    #[test]
    fn test_parse_tx_hash() {
        let cli = Cli::try_parse_from(["coinferry", "tx-hash", "--id", "123"]).unwrap();
        assert!(matches!(cli.command, Commands::TxHash(TxHashArgs { ref id }) if id == "123"));
    }

    #[test]
    fn test_parse_status_with_before() {
        let cli = Cli::try_parse_from([
            "coinferry",
            "status",
            "--address",
            "0xabc",
            "--chain",
            "Optimism",
            "--before",
            "1700000000",
        ])
        .unwrap();
        let Commands::Status(args) = cli.command else {
            panic!("expected status");
        };
        assert_eq!(args.before, Some(1_700_000_000));
    }
}
