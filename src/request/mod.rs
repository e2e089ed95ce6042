//! Typed parameters for requests. Each is validated before anything is sent.

mod get_trade_offers;
mod login;
pub mod trade_offer;

pub use get_trade_offers::GetTradeOffersOptions;
pub use login::LoginDetails;
pub use trade_offer::{NewTradeOffer, NewTradeOfferBuilder, NewTradeOfferItem};
