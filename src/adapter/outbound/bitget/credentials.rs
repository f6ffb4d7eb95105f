//! Bitget API key material.

use std::fmt;

/// API key, secret and passphrase of one Bitget key.
///
/// `Debug` never prints the secret or the passphrase.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    secret_key: String,
    passphrase: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            passphrase: passphrase.into(),
        }
    }

    /// Read `BITGET_API_KEY`, `BITGET_API_SECRET` and `BITGET_PASSPHRASE`.
    ///
    /// Missing variables become empty fields; check [`Self::is_complete`].
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self::new(
            var("BITGET_API_KEY"),
            var("BITGET_API_SECRET"),
            var("BITGET_PASSPHRASE"),
        )
    }

    /// True when all three fields are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.is_empty() && !self.passphrase.is_empty()
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    #[must_use]
    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub(crate) fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}
