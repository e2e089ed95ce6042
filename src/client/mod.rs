//! The client tying the components together.

mod builder;

pub use builder::ClientBuilder;

use crate::api::SteamTradeOfferAPI;
use crate::community::SteamCommunity;
use crate::error::{Error, Result};
use crate::helpers::get_default_client;
use crate::mobile_api::MobileAPI;
use crate::request::LoginDetails;
use crate::session::{Session, SessionStore};
use crate::types::TradeOfferId;
use std::sync::Arc;
use reqwest::cookie::Jar;
use steamid_ng::SteamID;

/// A client for one account. Every component shares the same HTTP client, cookie jar and
/// session, so logging in through [`Client::login`] authorizes requests made through
/// [`Client::api`] and [`Client::mobile_api`].
#[derive(Debug, Clone)]
pub struct Client {
    /// Logging in.
    pub community: SteamCommunity,
    /// Trade offers and inventories.
    pub api: SteamTradeOfferAPI,
    /// Mobile confirmations.
    pub mobile_api: MobileAPI,
    store: SessionStore,
    device_id: Option<String>,
}

impl Client {
    /// Builder for constructing a [`Client`].
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The Steam ID of the logged in account.
    pub fn get_steamid(&self) -> Option<SteamID> {
        self.store.session()
            .map(|session| SteamID::from(session.steamid))
    }

    /// The session ID.
    pub fn get_sessionid(&self) -> Option<String> {
        self.store.session()
            .map(|session| session.sessionid)
    }

    /// The device ID used for mobile confirmations.
    pub fn get_device_id(&self) -> Option<String> {
        self.store.session()
            .and_then(|session| session.device_id)
    }

    /// A copy of the session.
    pub fn session(&self) -> Option<Session> {
        self.store.session()
    }

    /// The cookies held for steamcommunity.com as `name=value` pairs.
    pub fn cookies(&self) -> Vec<String> {
        self.store.cookies()
    }

    /// Uses cookies from a session established elsewhere. Waits for requests in progress to
    /// finish before replacing the session.
    pub async fn set_cookies(&self, cookies: Vec<String>) -> Result<Session> {
        self.store.set_cookies(cookies, self.device_id.clone()).await
    }

    /// Logs in.
    pub async fn login(&self, details: &LoginDetails) -> Result<Session> {
        self.community.login(details).await
    }

    /// Measures and stores the difference between Steam's clock and the local clock.
    pub async fn sync_time_offset(&self) -> Result<i64> {
        self.community.sync_time_offset().await
    }

    /// Finds the confirmation for an offer we sent or accepted and accepts it.
    pub async fn accept_offer_confirmation(
        &self,
        tradeofferid: TradeOfferId,
    ) -> Result<()> {
        let confirmation = self.mobile_api.get_trade_confirmations().await?
            .into_iter()
            .find(|confirmation| confirmation.creator_id == tradeofferid)
            .ok_or(Error::NoConfirmationForOffer(tradeofferid))?;

        self.mobile_api.accept_confirmation(&confirmation).await
    }
}

impl TryFrom<ClientBuilder> for Client {
    type Error = Error;

    fn try_from(builder: ClientBuilder) -> Result<Self> {
        let cookies = Arc::new(Jar::default());
        let client = get_default_client(Arc::clone(&cookies), &builder.options)?;
        let store = SessionStore::new(cookies, &builder.hosts.community)?;

        store.set_time_offset(builder.time_offset);

        let community = SteamCommunity::new(
            client.clone(),
            store.clone(),
            builder.hosts.clone(),
            builder.device_id.clone(),
        );
        let api = SteamTradeOfferAPI::new(
            client.clone(),
            store.clone(),
            builder.hosts.clone(),
            builder.api_key,
            builder.language,
        );
        let mobile_api = MobileAPI::new(
            client,
            store.clone(),
            builder.hosts,
            builder.identity_secret,
            builder.legacy_confirmations,
        );
        let client = Self {
            community,
            api,
            mobile_api,
            store,
            device_id: builder.device_id,
        };

        if let Some(cookies) = builder.cookies {
            client.store.apply_cookies(cookies, client.device_id.clone())?;
        }

        Ok(client)
    }
}
