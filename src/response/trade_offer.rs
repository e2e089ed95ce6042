use super::{Asset, Description};
use crate::enums::{ConfirmationMethod, TradeOfferState};
use crate::serialize::{string, option_string, ts_seconds_option_none_when_zero, empty_string_is_none};
use crate::types::{ServerTime, TradeOfferId, TradeId};
use chrono::serde::ts_seconds;
use serde::{Serialize, Deserialize};
use steamid_ng::SteamID;

/// A trade offer.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOffer {
    /// The ID for this offer.
    pub tradeofferid: TradeOfferId,
    /// The trade ID for this offer. This should be present when the `trade_offer_state` of this
    /// offer is [`TradeOfferState::Accepted`].
    pub tradeid: Option<TradeId>,
    /// The [`SteamID`] of our partner.
    pub partner: SteamID,
    /// The message included in the offer. If the message is empty or not present this will be
    /// `None`.
    pub message: Option<String>,
    /// The items we're receiving in this offer.
    pub items_to_receive: Vec<Asset>,
    /// The items we're giving in this offer.
    pub items_to_give: Vec<Asset>,
    /// Whether this offer was created by us or not.
    pub is_our_offer: bool,
    /// Whether this offer originated from a real time trade.
    pub from_real_time_trade: bool,
    /// The time before the offer expires if it has not been acted on.
    pub expiration_time: ServerTime,
    /// The time this offer was created.
    pub time_created: ServerTime,
    /// The time this offer last had an action e.g. accepting or declining the offer.
    pub time_updated: ServerTime,
    /// The state of this offer.
    pub trade_offer_state: TradeOfferState,
    /// The end date if this trade is in escrow. `None` when this offer is not in escrow.
    pub escrow_end_date: Option<ServerTime>,
    /// The confirmation method for this offer.
    pub confirmation_method: ConfirmationMethod,
}

impl TradeOffer {
    /// Checks whether the trade offer is glitched or not by checking if no items are present.
    pub fn is_glitched(&self) -> bool {
        self.items_to_receive.is_empty() && self.items_to_give.is_empty()
    }
}

/// Offers returned from a listing, split by direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeOffers {
    /// Offers we sent.
    pub sent: Vec<TradeOffer>,
    /// Offers we received.
    pub received: Vec<TradeOffer>,
    /// Descriptions for the items in the offers, when requested.
    pub descriptions: Vec<Description>,
}

/// A trade offer as returned from the Web API.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub(crate) struct RawTradeOffer {
    #[serde(with = "string")]
    pub tradeofferid: TradeOfferId,
    #[serde(default)]
    #[serde(with = "option_string")]
    pub tradeid: Option<TradeId>,
    pub accountid_other: u32,
    #[serde(default)]
    #[serde(deserialize_with = "empty_string_is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub items_to_receive: Vec<Asset>,
    #[serde(default)]
    pub items_to_give: Vec<Asset>,
    #[serde(default)]
    pub is_our_offer: bool,
    #[serde(default)]
    pub from_real_time_trade: bool,
    #[serde(with = "ts_seconds")]
    pub expiration_time: ServerTime,
    #[serde(with = "ts_seconds")]
    pub time_created: ServerTime,
    #[serde(with = "ts_seconds")]
    pub time_updated: ServerTime,
    pub trade_offer_state: TradeOfferState,
    #[serde(default)]
    #[serde(with = "ts_seconds_option_none_when_zero")]
    pub escrow_end_date: Option<ServerTime>,
    #[serde(default)]
    pub confirmation_method: ConfirmationMethod,
}

impl From<RawTradeOffer> for TradeOffer {
    fn from(offer: RawTradeOffer) -> Self {
        Self {
            tradeofferid: offer.tradeofferid,
            tradeid: offer.tradeid,
            partner: SteamID::new(
                offer.accountid_other,
                steamid_ng::Instance::Desktop,
                steamid_ng::AccountType::Individual,
                steamid_ng::Universe::Public,
            ),
            message: offer.message,
            items_to_receive: offer.items_to_receive,
            items_to_give: offer.items_to_give,
            is_our_offer: offer.is_our_offer,
            from_real_time_trade: offer.from_real_time_trade,
            expiration_time: offer.expiration_time,
            time_created: offer.time_created,
            time_updated: offer.time_updated,
            trade_offer_state: offer.trade_offer_state,
            escrow_end_date: offer.escrow_end_date,
            confirmation_method: offer.confirmation_method,
        }
    }
}
