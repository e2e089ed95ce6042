use crate::response::{Asset, Description, RawTradeOffer};
use crate::serialize::{hashmap_or_vec, into_bool, option_string, option_string_0_as_none, string, string_or_number};
use crate::types::{Amount, AppId, AssetId, ClassId, ContextId, InstanceId, TradeId, TradeOfferId};
use serde::{Deserialize, Deserializer};

#[derive(Deserialize, Debug)]
pub struct GetTradeOfferResponse {
    #[serde(default)]
    pub response: Option<GetTradeOfferResponseBody>,
}

#[derive(Deserialize, Debug)]
pub struct GetTradeOfferResponseBody {
    #[serde(default)]
    pub offer: Option<RawTradeOffer>,
}

#[derive(Deserialize, Debug)]
pub struct GetTradeOffersResponse {
    #[serde(default)]
    pub response: Option<GetTradeOffersResponseBody>,
}

#[derive(Deserialize, Debug)]
pub struct GetTradeOffersResponseBody {
    #[serde(default)]
    pub trade_offers_sent: Vec<RawTradeOffer>,
    #[serde(default)]
    pub trade_offers_received: Vec<RawTradeOffer>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    #[serde(default)]
    pub next_cursor: Option<u32>,
}

/// The error string action endpoints embed in otherwise successful responses.
#[derive(Deserialize, Debug)]
pub struct StrErrorResponse {
    #[serde(default, rename = "strError")]
    pub str_error: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SendOfferResponse {
    #[serde(default, with = "option_string")]
    pub tradeofferid: Option<TradeOfferId>,
    #[serde(default)]
    pub needs_mobile_confirmation: bool,
    #[serde(default)]
    pub needs_email_confirmation: bool,
    #[serde(default)]
    pub email_domain: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct AcceptOfferResponse {
    #[serde(default, with = "option_string")]
    pub tradeid: Option<TradeId>,
    #[serde(default)]
    pub needs_mobile_confirmation: bool,
    #[serde(default)]
    pub needs_email_confirmation: bool,
    #[serde(default)]
    pub email_domain: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct GetInventoryResponse {
    #[serde(default, deserialize_with = "into_bool")]
    pub success: bool,
    #[serde(default, deserialize_with = "into_bool")]
    pub more_items: bool,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    #[serde(default, with = "option_string")]
    pub last_assetid: Option<AssetId>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RawPartnerAsset {
    #[serde(with = "string")]
    pub id: AssetId,
    #[serde(with = "string")]
    pub classid: ClassId,
    #[serde(default, with = "option_string_0_as_none")]
    pub instanceid: InstanceId,
    #[serde(with = "string_or_number")]
    pub amount: Amount,
}

impl RawPartnerAsset {
    pub fn into_asset(self, appid: AppId, contextid: ContextId) -> Asset {
        Asset {
            appid,
            contextid,
            assetid: self.id,
            classid: self.classid,
            instanceid: self.instanceid,
            amount: self.amount,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct GetPartnerInventoryResponse {
    #[serde(default, deserialize_with = "into_bool")]
    pub success: bool,
    #[serde(default, deserialize_with = "into_bool")]
    pub more: bool,
    /// A number, or `false` on the last page.
    #[serde(default, deserialize_with = "number_or_false")]
    pub more_start: Option<u32>,
    #[serde(default, rename = "rgInventory", deserialize_with = "hashmap_or_vec")]
    pub rg_inventory: Vec<RawPartnerAsset>,
    #[serde(default)]
    pub error: Option<String>,
}

fn number_or_false<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    Ok(value.as_u64().and_then(|n| u32::try_from(n).ok()))
}
