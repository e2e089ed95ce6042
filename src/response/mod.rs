//! Values returned by requests.

mod accepted_offer;
mod asset;
mod confirmation;
mod escrow;
mod receipt;
mod sent_offer;
mod trade_offer;

pub use accepted_offer::AcceptedOffer;
pub use asset::{Asset, Description};
pub use confirmation::Confirmation;
pub use escrow::EscrowDuration;
pub use receipt::ReceiptItem;
pub use sent_offer::SentOffer;
pub use trade_offer::{TradeOffer, TradeOffers};
pub(crate) use trade_offer::RawTradeOffer;
