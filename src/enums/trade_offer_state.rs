use num_enum::{TryFromPrimitive, IntoPrimitive};
use serde_repr::{Serialize_repr, Deserialize_repr};
use strum::{Display, EnumString};

/// The state of a trade offer. Transitions happen on Steam's side; re-fetch the offer to observe
/// the effect of an action.
#[derive(Serialize_repr, Deserialize_repr, Display, EnumString, Debug, PartialEq, Eq, TryFromPrimitive, IntoPrimitive, Clone, Copy)]
#[repr(u8)]
pub enum TradeOfferState {
    /// Invalid.
    Invalid = 1,
    /// This trade offer has been sent, neither party has acted on it yet.
    Active = 2,
    /// The trade offer was accepted by the recipient and items were exchanged.
    Accepted = 3,
    /// The recipient made a counter offer.
    Countered = 4,
    /// The trade offer was not accepted before the expiration date.
    Expired = 5,
    /// The sender cancelled the offer.
    Canceled = 6,
    /// The recipient declined the offer.
    Declined = 7,
    /// Some of the items in the offer are no longer available.
    InvalidItems = 8,
    /// The offer hasn't been sent yet and is awaiting confirmation.
    CreatedNeedsConfirmation = 9,
    /// Either party canceled the offer via email or mobile confirmation.
    CanceledBySecondFactor = 10,
    /// The trade has been placed on hold.
    InEscrow = 11,
}

impl TradeOfferState {
    /// Whether the offer can still be acted on.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active | Self::CreatedNeedsConfirmation)
    }
}
