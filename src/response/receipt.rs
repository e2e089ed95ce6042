use crate::serialize::{string_or_number, option_string_0_as_none};
use crate::types::{AppId, ContextId, AssetId, Amount, ClassId, InstanceId};
use serde::{Serialize, Deserialize};

/// An item received in a completed trade, read from the trade receipt page.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ReceiptItem {
    /// The app ID.
    pub appid: AppId,
    /// The context ID.
    #[serde(with = "string_or_number")]
    pub contextid: ContextId,
    /// The new asset ID of the item.
    #[serde(with = "string_or_number", rename = "id")]
    pub assetid: AssetId,
    /// The ID of the classinfo.
    #[serde(with = "string_or_number")]
    pub classid: ClassId,
    /// The instance ID of the classinfo.
    #[serde(default, with = "option_string_0_as_none")]
    pub instanceid: InstanceId,
    /// The amount.
    #[serde(with = "string_or_number")]
    pub amount: Amount,
    /// The name.
    #[serde(default)]
    pub name: String,
    /// The market name.
    #[serde(default)]
    pub market_hash_name: String,
}
