//! A client for Steam trade offers. Logs in to steamcommunity.com, answers mobile confirmations
//! and sends, accepts, declines and cancels trade offers.
//!
//! ```no_run
//! use steam_trade_session::{Client, LoginDetails, GetTradeOffersOptions};
//!
//! # async fn run() -> Result<(), steam_trade_session::Error> {
//! let client = Client::builder()
//!     .identity_secret("identity_secret".into())
//!     .build()?;
//!
//! client.sync_time_offset().await?;
//! client.login(&LoginDetails::new("account", "password")
//!     .shared_secret("shared_secret".into())).await?;
//!
//! let offers = client.api.get_trade_offers(&GetTradeOffersOptions::default()).await?;
//!
//! for offer in offers.received {
//!     println!("{} from {}", offer.tradeofferid, u64::from(offer.partner));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod community;
pub mod crypto;
pub mod enums;
pub mod error;
pub mod helpers;
pub mod inventory;
pub mod mobile_api;
pub mod request;
pub mod response;
pub mod retry;
pub mod serialize;
pub mod session;
pub mod time;
pub mod totp;
pub mod types;

pub use api::{EscrowTarget, SteamTradeOfferAPI};
pub use client::{Client, ClientBuilder};
pub use community::{LoginState, SteamCommunity};
pub use error::{Error, ErrorKind, Result};
pub use mobile_api::MobileAPI;
pub use request::{GetTradeOffersOptions, LoginDetails, NewTradeOffer};
pub use response::{Confirmation, TradeOffer};
pub use retry::RetryPolicy;
pub use session::{Session, SessionStore};
pub use totp::{Tag, TimeProvider};
pub use steamid_ng::SteamID;
