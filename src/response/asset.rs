use crate::inventory::PageItem;
use crate::serialize::{string, string_or_number, option_string_0_as_none, into_bool};
use crate::types::{AppId, ContextId, AssetId, Amount, ClassId, InstanceId};
use serde::{Serialize, Deserialize};

/// An item in an inventory or trade offer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Asset {
    /// The app ID e.g. 440 for Team Fortress 2 or 730 for Counter-Strike Global offensive.
    pub appid: AppId,
    /// The context ID.
    #[serde(with = "string_or_number")]
    pub contextid: ContextId,
    /// The unique asset ID. This value is unique to the item's `appid` and `contextid`.
    #[serde(with = "string")]
    pub assetid: AssetId,
    /// The ID of the classinfo.
    #[serde(with = "string")]
    pub classid: ClassId,
    /// The specific instance ID of the classinfo belonging to the class ID.
    #[serde(default, with = "option_string_0_as_none")]
    pub instanceid: InstanceId,
    /// The amount. If this item is not stackable the amount will be `1`.
    #[serde(with = "string_or_number")]
    pub amount: Amount,
}

impl PageItem for Asset {
    type Id = (AppId, ContextId, AssetId);

    fn page_item_id(&self) -> Self::Id {
        (self.appid, self.contextid, self.assetid)
    }
}

/// The description of a class of items.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Description {
    /// The app ID.
    #[serde(default)]
    pub appid: AppId,
    /// The ID of the class.
    #[serde(with = "string")]
    pub classid: ClassId,
    /// The instance ID of the class.
    #[serde(default, with = "option_string_0_as_none")]
    pub instanceid: InstanceId,
    /// The name.
    #[serde(default)]
    pub name: String,
    /// The market name.
    #[serde(default)]
    pub market_hash_name: String,
    /// Whether the item can be traded.
    #[serde(default, deserialize_with = "into_bool")]
    pub tradable: bool,
    /// Whether the item can be listed on the market.
    #[serde(default, deserialize_with = "into_bool")]
    pub marketable: bool,
}
