//! Architecture contract tests.

mod support;

use support::architecture::{lines_containing, read_relative, source_lines};

#[test]
fn domain_has_no_framework_or_outer_layer_imports() {
    let hits = lines_containing(
        "src/domain",
        &[
            "crate::adapter",
            "crate::infrastructure",
            "crate::application",
            "crate::port",
            "tokio::",
            "reqwest::",
        ],
    );

    assert!(
        hits.is_empty(),
        "found forbidden imports in domain layer: {hits:#?}"
    );
}

#[test]
fn funding_port_depends_only_on_domain() {
    let hits = lines_containing(
        "src/port",
        &["crate::adapter", "crate::application", "crate::infrastructure"],
    );

    assert!(
        hits.is_empty(),
        "funding port should only depend on domain types: {hits:#?}"
    );
}

#[test]
fn wallet_dispatch_goes_through_the_port() {
    let hits = lines_containing("src/application/dispatch.rs", &["crate::adapter", "Bitget"]);
    assert!(
        hits.is_empty(),
        "wallet dispatch should only know the FundingExchange port: {hits:#?}"
    );

    let source = read_relative("src/application/dispatch.rs");
    assert!(
        source.contains("exchange: &dyn FundingExchange"),
        "withdraw_to_wallet should accept any FundingExchange"
    );
}

#[test]
fn signing_has_no_network_access() {
    let hits = lines_containing(
        "src/adapter/outbound/bitget/signing.rs",
        &["reqwest::", "tokio::"],
    );
    assert!(
        hits.is_empty(),
        "request signing should stay a pure function of its inputs: {hits:#?}"
    );
}

#[test]
fn credentials_never_come_from_the_config_file() {
    let source = read_relative("src/adapter/outbound/bitget/settings.rs");
    assert!(
        source.contains("#[serde(skip)]\n    pub credentials: Credentials"),
        "Bitget credentials must be skipped by the config deserializer"
    );
}

#[test]
fn mod_rs_is_export_only() {
    let violations: Vec<_> = source_lines("src")
        .into_iter()
        .filter(|line| line.file.ends_with("/mod.rs"))
        .filter(|line| {
            let text = line.text.trim();
            !(text.is_empty()
                || text.starts_with("//")
                || text.starts_with("pub mod ")
                || text.starts_with("mod ")
                || text.starts_with("pub use ")
                || text.starts_with("#[cfg"))
        })
        .collect();
    assert!(
        violations.is_empty(),
        "found non-export content in mod.rs files: {violations:#?}"
    );
}

#[test]
fn cli_dispatch_lives_in_run_rs() {
    let source = read_relative("src/adapter/inbound/cli/run.rs");
    assert!(
        source.contains("pub async fn execute(cli: &Cli) -> Result<()>"),
        "cli/run.rs should expose `execute`"
    );
}
