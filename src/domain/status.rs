//! Categorical values exchanged with Bitget.
//!
//! Each type maps to the raw wire value (`state`) Bitget sends and expects.

use std::fmt;

/// Account type used for transfers and balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Spot,
    Margin,
}

impl AccountType {
    const ALL: [Self; 2] = [Self::Spot, Self::Margin];

    #[must_use]
    pub const fn state(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Margin => "margin",
        }
    }

    #[must_use]
    pub fn from_state(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.state() == raw)
    }
}

/// Direction of an internal transfer, as sent in `transferType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferType {
    WithinAccount,
    /// Subaccount to master, authorized by the master key.
    SubToMaster,
}

impl TransferType {
    #[must_use]
    pub const fn state(self) -> &'static str {
        match self {
            Self::WithinAccount => "0",
            Self::SubToMaster => "2",
        }
    }
}

/// Withdrawal destination kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    OnChain,
    /// Transfer to another Bitget user, off chain.
    Internal,
}

impl TransactionType {
    #[must_use]
    pub const fn state(self) -> &'static str {
        match self {
            Self::OnChain => "on_chain",
            Self::Internal => "inner_transfer",
        }
    }

    /// Withdrawal records spell internal transfers both ways.
    #[must_use]
    pub fn from_state(raw: &str) -> Option<Self> {
        match raw {
            "on_chain" => Some(Self::OnChain),
            "inner_transfer" | "internal_transfer" => Some(Self::Internal),
            _ => None,
        }
    }
}

/// Subaccount kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubaccountType {
    Standard,
    ManagedTrading,
    Custody,
}

impl SubaccountType {
    const ALL: [Self; 3] = [Self::Standard, Self::ManagedTrading, Self::Custody];

    #[must_use]
    pub const fn state(self) -> &'static str {
        match self {
            Self::Standard => "1",
            Self::ManagedTrading => "2",
            Self::Custody => "5",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::ManagedTrading => "managed trading",
            Self::Custody => "custody",
        }
    }

    #[must_use]
    pub fn from_state(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.state() == raw)
    }
}

/// Known deposit/withdrawal states: (wire value, display name).
const KNOWN_STATUSES: &[(&str, &str)] = &[
    ("pending", "pending"),
    ("success", "success"),
    ("fail", "failed"),
    ("cancel", "cancelled"),
    ("reject", "rejected"),
];

/// States that mean a withdrawal has cleared.
const TERMINAL_SUCCESS: &[&str] = &["success", "completed", "done", "finished"];

/// Deposit or withdrawal status.
///
/// Unknown wire values are kept verbatim (`state == name == raw`) instead of
/// failing the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Status {
    pub state: String,
    pub name: String,
}

impl Status {
    pub fn from_raw(raw: &str) -> Self {
        let name = KNOWN_STATUSES
            .iter()
            .find(|(state, _)| *state == raw)
            .map_or(raw, |(_, name)| *name);
        Self {
            state: raw.to_string(),
            name: name.to_string(),
        }
    }

    /// True for the small set of states meaning the funds arrived.
    #[must_use]
    pub fn is_terminal_success(&self) -> bool {
        let state = self.state.to_lowercase();
        TERMINAL_SUCCESS.contains(&state.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
