use clap::Parser;

use coinferry::adapter::inbound::cli::command::{Cli, ColorChoice};
use coinferry::adapter::inbound::cli::output::{self, OutputMode};
use coinferry::adapter::inbound::cli::run::execute;
use coinferry::adapter::inbound::cli::session;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    output::configure(OutputMode {
        json: cli.json,
        quiet: cli.quiet,
    });

    let logging = session::load_config(cli.config.as_deref())
        .map(|config| config.logging)
        .unwrap_or_default();
    logging.init_with_level(match cli.verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    });

    if let Err(err) = run(&cli).await {
        output::error(&format!("{err:#}"));
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    execute(cli).await?;
    Ok(())
}
