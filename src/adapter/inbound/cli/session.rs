//! Configuration loading and client setup shared by command handlers.

use std::path::{Path, PathBuf};

use crate::adapter::inbound::cli::output::{self, Step};
use crate::application::BitgetActions;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;

/// Config file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG: &str = "config.toml";

/// Load the config named on the command line, `./config.toml` when present,
/// or defaults plus environment credentials.
#[allow(clippy::result_large_err)]
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match resolve_path(path) {
        Some(path) => Config::load(path),
        None => Config::from_env(),
    }
}

/// The config file that [`load_config`] reads, if any.
#[must_use]
pub fn resolve_path(path: Option<&Path>) -> Option<PathBuf> {
    match path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG);
            default.is_file().then_some(default)
        }
    }
}

/// Connect to Bitget, failing when credentials are missing.
pub async fn connect(config: &Config) -> Result<BitgetActions> {
    let step = Step::start("Connecting to Bitget...");
    let actions = match BitgetActions::from_config(&config.bitget).await {
        Ok(actions) => actions,
        Err(err) => {
            step.failed("Connection failed");
            return Err(err.into());
        }
    };
    if !actions.is_configured() {
        step.failed("Credentials missing");
        return Err(Error::Command(
            "set BITGET_API_KEY, BITGET_API_SECRET and BITGET_PASSPHRASE".to_string(),
        ));
    }

    let client = actions.client()?;
    step.done(&format!("Connected to {}", client.base_url()));
    if let Some(warning) = client.proxy_warning() {
        output::warning(&warning.to_string());
    }
    Ok(actions)
}

/// `requested` or the configured withdrawal token, uppercased.
#[must_use]
pub fn symbol_or_default(requested: Option<&str>, config: &Config) -> String {
    requested
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(&config.withdrawal.token)
        .trim()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_falls_back_to_configured_token() {
        let config = Config::default();
        assert_eq!(symbol_or_default(None, &config), "ETH");
        assert_eq!(symbol_or_default(Some(" "), &config), "ETH");
        assert_eq!(symbol_or_default(Some("usdt"), &config), "USDT");
    }

    #[test]
    fn explicit_path_is_used_even_when_missing() {
        let path = Path::new("/nonexistent/coinferry.toml");
        assert_eq!(resolve_path(Some(path)), Some(path.to_path_buf()));
        assert!(load_config(Some(path)).is_err());
    }
}
