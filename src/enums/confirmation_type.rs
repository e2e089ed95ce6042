use serde::{Serialize, Deserialize};
use strum::Display;

/// The type of confirmation.
#[derive(Debug, Serialize, Deserialize, Display, PartialEq, Eq, Clone, Copy, Default)]
#[serde(from = "u32", into = "u32")]
pub enum ConfirmationType {
    /// Generic.
    #[default]
    Generic,
    /// Confirmation to confirm trade.
    Trade,
    /// Confirmation to confirm on market.
    MarketSell,
    /// Confirmation for account recovery.
    AccountRecovery,
    /// Unknown.
    Unknown(u32),
}

impl From<u32> for ConfirmationType {
    fn from(value: u32) -> Self {
        match value {
            1 => ConfirmationType::Generic,
            2 => ConfirmationType::Trade,
            3 => ConfirmationType::MarketSell,
            6 => ConfirmationType::AccountRecovery,
            other => ConfirmationType::Unknown(other),
        }
    }
}

impl From<ConfirmationType> for u32 {
    fn from(conf_type: ConfirmationType) -> Self {
        match conf_type {
            ConfirmationType::Generic => 1,
            ConfirmationType::Trade => 2,
            ConfirmationType::MarketSell => 3,
            ConfirmationType::AccountRecovery => 6,
            ConfirmationType::Unknown(other) => other,
        }
    }
}

/// Parses the `data-type` attribute of a confirmation entry.
impl From<&str> for ConfirmationType {
    fn from(value: &str) -> Self {
        value.trim().parse::<u32>()
            .map(ConfirmationType::from)
            .unwrap_or(ConfirmationType::Unknown(0))
    }
}
