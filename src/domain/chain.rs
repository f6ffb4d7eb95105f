//! Chain names as Bitget reports them.
//!
//! The exact chain code accepted by the withdrawal endpoint comes from
//! `/api/v2/spot/public/coins` (`chains[*]`). [`Chain`] only lists common
//! display names for comparison and for CLI defaults; resolution against the
//! live coin list happens in the workflow layer.

use std::fmt;

/// Well-known chain display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Erc20,
    Trc20,
    Bep20,
    ArbitrumOne,
    Optimism,
    Polygon,
    Solana,
    Bitcoin,
    Ton,
    AvalancheC,
    Base,
    ZkSyncEra,
}

impl Chain {
    pub const ALL: [Chain; 12] = [
        Chain::Erc20,
        Chain::Trc20,
        Chain::Bep20,
        Chain::ArbitrumOne,
        Chain::Optimism,
        Chain::Polygon,
        Chain::Solana,
        Chain::Bitcoin,
        Chain::Ton,
        Chain::AvalancheC,
        Chain::Base,
        Chain::ZkSyncEra,
    ];

    /// Display name as used by Bitget.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Erc20 => "ERC20",
            Self::Trc20 => "TRC20",
            Self::Bep20 => "BSC",
            Self::ArbitrumOne => "Arbitrum One",
            Self::Optimism => "Optimism",
            Self::Polygon => "Polygon",
            Self::Solana => "Solana",
            Self::Bitcoin => "Bitcoin",
            Self::Ton => "TON",
            Self::AvalancheC => "Avalanche C-Chain",
            Self::Base => "Base",
            Self::ZkSyncEra => "zkSync Era",
        }
    }

    /// Look up a chain by its display name, ignoring case.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|chain| are_equal(chain.display_name(), name))
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Case-insensitive comparison of two chain names.
#[must_use]
pub fn are_equal(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Reduce a chain name to lowercase ASCII alphanumerics.
///
/// `"Arbitrum One"`, `"arbitrum-one"` and `"ARBITRUMONE"` all become
/// `"arbitrumone"`.
#[must_use]
pub fn normalize_chain(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Compare an already-normalized wanted name against a raw candidate.
///
/// Names match when equal or when either contains the other. Empty names on
/// either side never match.
#[must_use]
pub fn chain_matches(want: &str, candidate: &str) -> bool {
    let candidate = normalize_chain(candidate);
    if want.is_empty() || candidate.is_empty() {
        return false;
    }
    candidate == want || candidate.contains(want) || want.contains(&candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_and_punctuation() {
        assert_eq!(normalize_chain("Arbitrum One"), "arbitrumone");
        assert_eq!(normalize_chain("arbitrum-one"), "arbitrumone");
        assert_eq!(normalize_chain("ARBITRUMONE"), "arbitrumone");
        assert_eq!(normalize_chain("Avalanche C-Chain"), "avalanchecchain");
        assert_eq!(normalize_chain(" - "), "");
    }

    #[test]
    fn match_accepts_equality_or_containment() {
        assert!(chain_matches("optimism", "Optimism"));
        assert!(chain_matches("arbitrum", "ArbitrumOne"));
        assert!(chain_matches("arbitrumone", "Arbitrum"));
        assert!(!chain_matches("base", "Solana"));
    }

    #[test]
    fn empty_names_never_match() {
        assert!(!chain_matches("", "Optimism"));
        assert!(!chain_matches("optimism", "--"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(Chain::lookup("arbitrum one"), Some(Chain::ArbitrumOne));
        assert_eq!(Chain::lookup("BSC"), Some(Chain::Bep20));
        assert_eq!(Chain::lookup("linea"), None);
        assert!(are_equal("zkSync Era", "ZKSYNC ERA"));
    }
}
