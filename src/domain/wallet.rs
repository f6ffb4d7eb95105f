//! Wallet record consumed from the wallet store.

use std::fmt;

/// A wallet the workflows fund or inspect.
///
/// Only the fields the exchange workflows read are modelled here; the wallet
/// store owns the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    pub id: u64,
    pub address: String,
    pub proxy: Option<String>,
}

impl Wallet {
    pub fn new(id: u64, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
            proxy: None,
        }
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

impl fmt::Display for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[coinferry | {} | {}]", self.id, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_id_and_address() {
        let wallet = Wallet::new(7, "0xabc").with_proxy("1.2.3.4:8080");
        assert_eq!(wallet.to_string(), "[coinferry | 7 | 0xabc]");
        assert_eq!(wallet.proxy.as_deref(), Some("1.2.3.4:8080"));
    }
}
