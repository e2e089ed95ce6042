use crate::enums::ConfirmationType;
use crate::types::{ConfirmationId, ServerTime};
use crate::serialize;
use std::fmt;
use serde::{Serialize, Deserialize};

/// Mobile confirmation. Used primarily for confirming trade offers or listing items on the market.
///
/// Confirmations are fetched fresh for every listing and answered with both the `id` and the
/// `nonce` exactly as received.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Confirmation {
    /// The ID of the confirmation.
    #[serde(with = "serialize::string")]
    pub id: ConfirmationId,
    /// The key sent back when answering this confirmation.
    #[serde(with = "serialize::string")]
    pub nonce: u64,
    /// Trade offer ID or market transaction ID.
    #[serde(with = "serialize::string")]
    pub creator_id: u64,
    /// The confirmation type.
    #[serde(default, rename = "type")]
    pub conf_type: ConfirmationType,
    /// The type name.
    #[serde(default)]
    pub type_name: String,
    /// The headline.
    #[serde(default)]
    pub headline: String,
    /// The description.
    #[serde(default)]
    pub summary: Vec<String>,
    /// The time the confirmation was created.
    #[serde(default, with = "serialize::ts_seconds_option_none_when_zero")]
    pub creation_time: Option<ServerTime>,
    /// The icon.
    #[serde(default)]
    pub icon: Option<String>,
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.conf_type, self.headline)
    }
}

impl Confirmation {
    /// Whether this confirmation is for a trade offer.
    pub fn is_trade(&self) -> bool {
        self.conf_type == ConfirmationType::Trade
    }

    /// Description for items we are giving in a trade.
    pub fn giving(&self) -> Option<&str> {
        if !self.is_trade() {
            return None;
        }

        self.summary.first().map(|s| s.as_str())
    }

    /// Description for items we are receiving in a trade.
    pub fn receiving(&self) -> Option<&str> {
        if !self.is_trade() {
            return None;
        }

        self.summary.get(1).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trade_offer_confirmation() {
        let confirmation: Confirmation = serde_json::from_str(r#"{
            "type": 2,
            "type_name": "Trade Offer",
            "id": "13799599785",
            "creator_id": "5127445123",
            "nonce": "9141945700999917347",
            "creation_time": 1667253419,
            "cancel": "Cancel",
            "accept": "Send Offer",
            "icon": "https://avatars.akamai.steamstatic.com/icon.jpg",
            "multi": false,
            "headline": "Trade with someone",
            "summary": ["You will give up your Mann Co. Supply Crate Key", "You will receive nothing"],
            "warn": null
        }"#).unwrap();

        assert_eq!(confirmation.id, 13799599785);
        assert_eq!(confirmation.nonce, 9141945700999917347);
        assert_eq!(confirmation.creator_id, 5127445123);
        assert_eq!(confirmation.conf_type, ConfirmationType::Trade);
        assert_eq!(confirmation.receiving(), Some("You will receive nothing"));
    }
}
