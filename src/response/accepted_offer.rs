use serde::{Serialize, Deserialize};
use crate::{types::TradeId, serialize::option_string};

/// The result returned after accepting a trade offer. The offer may still be processing; fetch it
/// again to confirm the trade completed.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedOffer {
    /// The ID of the trade, when it was created right away.
    #[serde(default, with = "option_string")]
    pub tradeid: Option<TradeId>,
    /// Whether the offer needs mobile confirmation or not.
    #[serde(default)]
    pub needs_mobile_confirmation: bool,
    /// Whether the offer needs email confirmation or not.
    #[serde(default)]
    pub needs_email_confirmation: bool,
    /// The email domain if this offer requires email confirmation.
    #[serde(default)]
    pub email_domain: Option<String>,
}
