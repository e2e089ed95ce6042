//! Types for common values in Steam responses.

/// Uniquely identifies an application on Steam. For example: 440 for Team Fortress 2.
pub type AppId = u32;
/// A context ID belonging to an [`AppId`].
pub type ContextId = u64;
/// An asset ID unique to an [`AppId`] + [`ContextId`] combination.
pub type AssetId = u64;
/// An amount for stackable items. For non-stackable items this is simply `1`.
pub type Amount = u32;
/// An ID for a class which provides a general overview of an item.
pub type ClassId = u64;
/// A more specific instance of a class, for example a Team Fortress 2 item which is painted.
pub type InstanceId = Option<u64>;
/// An ID of a trade offer.
pub type TradeOfferId = u64;
/// An ID of a trade.
pub type TradeId = u64;
/// An ID of a mobile confirmation.
pub type ConfirmationId = u64;

pub use crate::time::ServerTime;

use reqwest_middleware::ClientWithMiddleware;

/// The HTTP client shared by every component.
pub type HttpClient = ClientWithMiddleware;
