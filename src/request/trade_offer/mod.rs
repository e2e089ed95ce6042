mod item;
mod builder;

pub use item::NewTradeOfferItem;
pub use builder::NewTradeOfferBuilder;

use crate::error::ParameterError;
use crate::response;
use crate::types::TradeOfferId;
use steamid_ng::SteamID;

/// Represents a trade offer not yet sent. A counter offer including the items from an existing
/// offer can be created by calling `from` on the offer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTradeOffer {
    /// The partner's [`SteamID`] for this offer.
    pub partner: SteamID,
    /// The items to give in this offer.
    pub items_to_give: Vec<NewTradeOfferItem>,
    /// The items to receive in this offer.
    pub items_to_receive: Vec<NewTradeOfferItem>,
    /// The message to send in this offer.
    pub message: Option<String>,
    /// The access token for sending an offer if you are not friends with the partner.
    pub token: Option<String>,
    /// The offer this offer is a counter to.
    pub counter_offer_id: Option<TradeOfferId>,
}

impl NewTradeOffer {
    /// Creates a builder for an offer to `partner`.
    pub fn builder(partner: SteamID) -> NewTradeOfferBuilder {
        NewTradeOfferBuilder::new(partner)
    }

    /// Checks if any items are included in the offer.
    pub fn is_empty(&self) -> bool {
        self.items_to_give.is_empty() &&
        self.items_to_receive.is_empty()
    }

    /// Fails with [`ParameterError::EmptyOffer`] when there are no items in the offer.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.is_empty() {
            return Err(ParameterError::EmptyOffer);
        }

        Ok(())
    }
}

/// A counter offer to `offer` with the same items.
impl From<&response::TradeOffer> for NewTradeOffer {
    fn from(offer: &response::TradeOffer) -> Self {
        Self {
            partner: offer.partner,
            items_to_give: offer.items_to_give.iter().map(NewTradeOfferItem::from).collect(),
            items_to_receive: offer.items_to_receive.iter().map(NewTradeOfferItem::from).collect(),
            message: None,
            token: None,
            counter_offer_id: Some(offer.tradeofferid),
        }
    }
}
