use super::{NewTradeOfferItem, NewTradeOffer};
use crate::types::TradeOfferId;
use steamid_ng::SteamID;

/// Builder for constructing new trade offers.
#[derive(Debug, Clone)]
pub struct NewTradeOfferBuilder {
    partner: SteamID,
    items_to_give: Vec<NewTradeOfferItem>,
    items_to_receive: Vec<NewTradeOfferItem>,
    message: Option<String>,
    token: Option<String>,
    counter_offer_id: Option<TradeOfferId>,
}

impl NewTradeOfferBuilder {
    /// Creates a new [`NewTradeOfferBuilder`] with the given partner.
    pub fn new(partner: SteamID) -> Self {
        Self {
            partner,
            items_to_give: Vec::new(),
            items_to_receive: Vec::new(),
            message: None,
            token: None,
            counter_offer_id: None,
        }
    }

    /// The items to give in this offer.
    pub fn items_to_give<T>(mut self, items: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<NewTradeOfferItem>
    {
        self.items_to_give = items.into_iter().map(|i| i.into()).collect();
        self
    }

    /// The items to receive in this offer.
    pub fn items_to_receive<T>(mut self, items: T) -> Self
    where
        T: IntoIterator,
        T::Item: Into<NewTradeOfferItem>
    {
        self.items_to_receive = items.into_iter().map(|i| i.into()).collect();
        self
    }

    /// The trade offer URL for sending an offer if you are not friends with the partner.
    /// Silently fails if the URL does not contain a token. If you want to check if the token
    /// was parsed successfully check [`NewTradeOffer::token`] after building.
    pub fn trade_offer_url(mut self, trade_offer_url: &str) -> Self {
        self.token = parse_offer_access_token(trade_offer_url);
        self
    }

    /// The token for sending an offer if you are not friends with the partner.
    pub fn token(mut self, token: String) -> Self {
        self.token = Some(token);
        self
    }

    /// The message to send in this offer.
    pub fn message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }

    /// Sends this offer as a counter to an existing offer.
    pub fn counter_offer_id(mut self, tradeofferid: TradeOfferId) -> Self {
        self.counter_offer_id = Some(tradeofferid);
        self
    }

    /// Builds into [`NewTradeOffer`].
    pub fn build(self) -> NewTradeOffer {
        NewTradeOffer {
            partner: self.partner,
            items_to_give: self.items_to_give,
            items_to_receive: self.items_to_receive,
            message: self.message,
            token: self.token,
            counter_offer_id: self.counter_offer_id,
        }
    }
}

fn parse_offer_access_token(trade_offer_url: &str) -> Option<String> {
    let url = url::Url::parse(trade_offer_url).ok()?;

    if url.host_str() != Some("steamcommunity.com") {
        return None;
    }

    url.query_pairs()
        .find(|(key, _value)| key == "token")
        // not a valid token
        .filter(|(_key, value)| value.len() == 8)
        .map(|(_key, value)| value.into_owned())
}
