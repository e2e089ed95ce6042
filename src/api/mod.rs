//! Trade offers and inventories.
//!
//! Offers are read through the Steam Web API while accepting and sending go through the
//! steamcommunity.com trade offer pages. Action endpoints only report that a request was
//! received. Re-fetch the offer with [`SteamTradeOfferAPI::get_trade_offer`] to learn its state.

mod helpers;
mod response;

use helpers::{offer_referer_url, parse_escrow_duration, parse_receipt_script};
use response::{
    AcceptOfferResponse,
    GetInventoryResponse,
    GetPartnerInventoryResponse,
    GetTradeOfferResponse,
    GetTradeOffersResponse,
    SendOfferResponse,
    StrErrorResponse,
};
use crate::error::{Error, ParameterError, ParseHtmlError, Result, TradeOfferError};
use crate::helpers::{check_response, page_error, parse_body, parses_response, Hosts};
use crate::inventory::{fetch_all, InventoryPage};
use crate::request::{GetTradeOffersOptions, NewTradeOffer, NewTradeOfferItem};
use crate::response::{
    AcceptedOffer,
    Asset,
    EscrowDuration,
    ReceiptItem,
    SentOffer,
    TradeOffer,
    TradeOffers,
};
use crate::retry::RetryPolicy;
use crate::session::SessionStore;
use crate::types::{AppId, AssetId, ContextId, HttpClient, TradeId, TradeOfferId};
use std::collections::HashSet;
use lazy_regex::{regex_captures, regex_is_match};
use reqwest::StatusCode;
use reqwest::header::REFERER;
use serde::Serialize;
use serde::de::DeserializeOwned;
use steamid_ng::SteamID;

const INVENTORY_PAGE_SIZE: u32 = 2000;

/// Whose escrow duration to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscrowTarget {
    /// Before sending an offer to `partner`. The token is needed when not friends.
    Partner {
        partner: SteamID,
        token: Option<String>,
    },
    /// For an offer that was received.
    Offer(TradeOfferId),
}

/// The API for trade offers.
#[derive(Debug, Clone)]
pub struct SteamTradeOfferAPI {
    client: HttpClient,
    store: SessionStore,
    hosts: Hosts,
    /// The Steam Web API key. The session's access token is used when not set.
    api_key: Option<String>,
    /// The language for descriptions.
    language: String,
}

impl SteamTradeOfferAPI {
    pub fn new(
        client: HttpClient,
        store: SessionStore,
        hosts: Hosts,
        api_key: Option<String>,
        language: String,
    ) -> Self {
        Self {
            client,
            store,
            hosts,
            api_key,
            language,
        }
    }

    /// The query parameter authorizing Web API requests.
    fn api_authorization(&self) -> Result<(&'static str, String)> {
        if let Some(api_key) = &self.api_key {
            return Ok(("key", api_key.clone()));
        }

        self.store.session()
            .and_then(|session| session.access_token)
            .map(|access_token| ("access_token", access_token))
            .ok_or_else(|| ParameterError::NoApiKeyOrAccessToken.into())
    }

    /// Gets a trade offer.
    pub async fn get_trade_offer(
        &self,
        tradeofferid: TradeOfferId,
    ) -> Result<TradeOffer> {
        let authorization = self.api_authorization()?;
        let _guard = self.store.lock_shared().await;
        let uri = self.hosts.api_url("IEconService", "GetTradeOffer", 1);
        let response = self.client.get(&uri)
            .query(&[
                authorization,
                ("tradeofferid", tradeofferid.to_string()),
                ("language", self.language.clone()),
            ])
            .send()
            .await?;
        let body: GetTradeOfferResponse = parses_response(response).await?;
        let offer = body.response
            .and_then(|response| response.offer)
            .ok_or(Error::EmptyOfferResult)?;

        Ok(offer.into())
    }

    /// Gets a trade offer, retrying according to `policy`.
    pub async fn get_trade_offer_with_retry(
        &self,
        tradeofferid: TradeOfferId,
        policy: &RetryPolicy,
    ) -> Result<TradeOffer> {
        policy.execute(|| self.get_trade_offer(tradeofferid)).await
    }

    /// Gets trade offers, following the cursor until every page is read.
    pub async fn get_trade_offers(
        &self,
        options: &GetTradeOffersOptions,
    ) -> Result<TradeOffers> {
        options.validate()?;

        let authorization = self.api_authorization()?;
        let _guard = self.store.lock_shared().await;
        let uri = self.hosts.api_url("IEconService", "GetTradeOffers", 1);
        let mut query = vec![
            authorization,
            ("language", self.language.clone()),
        ];

        for (name, set) in [
            ("get_sent_offers", options.get_sent_offers),
            ("get_received_offers", options.get_received_offers),
            ("get_descriptions", options.get_descriptions),
            ("active_only", options.active_only),
            ("historical_only", options.historical_only),
        ] {
            if set {
                query.push((name, "1".into()));
            }
        }

        if let Some(cutoff) = options.historical_cutoff {
            query.push(("time_historical_cutoff", cutoff.timestamp().to_string()));
        }

        let mut offers = TradeOffers::default();
        let mut cursor: Option<u32> = None;

        loop {
            let mut page_query = query.clone();

            if let Some(cursor) = cursor {
                page_query.push(("cursor", cursor.to_string()));
            }

            let response = self.client.get(&uri)
                .query(&page_query)
                .send()
                .await?;
            let body: GetTradeOffersResponse = parses_response(response).await?;
            let body = body.response.ok_or(Error::EmptyOffersResult)?;

            offers.sent.extend(body.trade_offers_sent.into_iter().map(TradeOffer::from));
            offers.received.extend(body.trade_offers_received.into_iter().map(TradeOffer::from));
            offers.descriptions.extend(body.descriptions);

            match body.next_cursor {
                Some(next_cursor) if next_cursor > 0 => {
                    if Some(next_cursor) == cursor {
                        return Err(Error::Response("Offers cursor did not advance".into()));
                    }

                    log::debug!("Fetching next page of offers at cursor {next_cursor}");
                    cursor = Some(next_cursor);
                },
                _ => break,
            }
        }

        Ok(offers)
    }

    /// Gets trade offers, retrying according to `policy`.
    pub async fn get_trade_offers_with_retry(
        &self,
        options: &GetTradeOffersOptions,
        policy: &RetryPolicy,
    ) -> Result<TradeOffers> {
        policy.execute(|| self.get_trade_offers(options)).await
    }

    async fn offer_action(
        &self,
        method: &str,
        tradeofferid: TradeOfferId,
    ) -> Result<()> {
        let authorization = self.api_authorization()?;
        let _guard = self.store.lock_shared().await;
        let uri = self.hosts.api_url("IEconService", method, 1);
        let response = self.client.post(&uri)
            .form(&[
                authorization,
                ("tradeofferid", tradeofferid.to_string()),
            ])
            .send()
            .await?;

        check_response(response).await?;
        log::debug!("{method} sent for offer {tradeofferid}");

        Ok(())
    }

    /// Declines an offer we received. Success only means the request was received.
    pub async fn decline_offer(
        &self,
        tradeofferid: TradeOfferId,
    ) -> Result<()> {
        self.offer_action("DeclineTradeOffer", tradeofferid).await
    }

    /// Declines an offer, retrying according to `policy`.
    pub async fn decline_offer_with_retry(
        &self,
        tradeofferid: TradeOfferId,
        policy: &RetryPolicy,
    ) -> Result<()> {
        policy.execute(|| self.decline_offer(tradeofferid)).await
    }

    /// Cancels an offer we sent. Success only means the request was received.
    pub async fn cancel_offer(
        &self,
        tradeofferid: TradeOfferId,
    ) -> Result<()> {
        self.offer_action("CancelTradeOffer", tradeofferid).await
    }

    /// Cancels an offer, retrying according to `policy`.
    pub async fn cancel_offer_with_retry(
        &self,
        tradeofferid: TradeOfferId,
        policy: &RetryPolicy,
    ) -> Result<()> {
        policy.execute(|| self.cancel_offer(tradeofferid)).await
    }

    /// Accepts an offer. Steam finishes the trade after responding, so re-fetch the offer to
    /// check that it was accepted.
    pub async fn accept_offer(
        &self,
        tradeofferid: TradeOfferId,
    ) -> Result<AcceptedOffer> {
        #[derive(Serialize, Debug)]
        struct AcceptOfferParams<'a> {
            sessionid: &'a str,
            serverid: u32,
            tradeofferid: String,
            captcha: &'static str,
        }

        let _guard = self.store.lock_shared().await;
        let session = self.store.require()?;
        let referer = self.hosts.community_url(&format!("/tradeoffer/{tradeofferid}/"));
        let uri = self.hosts.community_url(&format!("/tradeoffer/{tradeofferid}/accept"));
        let response = self.client.post(&uri)
            .header(REFERER, referer)
            .form(&AcceptOfferParams {
                sessionid: &session.sessionid,
                serverid: 1,
                tradeofferid: tradeofferid.to_string(),
                captcha: "",
            })
            .send()
            .await?;
        let body: AcceptOfferResponse = parses_action_response(response).await?;

        Ok(AcceptedOffer {
            tradeid: body.tradeid,
            needs_mobile_confirmation: body.needs_mobile_confirmation,
            needs_email_confirmation: body.needs_email_confirmation,
            email_domain: body.email_domain,
        })
    }

    /// Accepts an offer, retrying according to `policy`.
    pub async fn accept_offer_with_retry(
        &self,
        tradeofferid: TradeOfferId,
        policy: &RetryPolicy,
    ) -> Result<AcceptedOffer> {
        policy.execute(|| self.accept_offer(tradeofferid)).await
    }

    /// Sends an offer. When `counter_offer_id` is set the offer is sent as a counter offer,
    /// otherwise the token is used to send to a partner we are not friends with.
    pub async fn send_offer(
        &self,
        offer: &NewTradeOffer,
    ) -> Result<SentOffer> {
        #[derive(Serialize, Debug)]
        struct OfferFormUser<'b> {
            assets: &'b [NewTradeOfferItem],
            currency: Vec<()>,
            ready: bool,
        }

        #[derive(Serialize, Debug)]
        struct OfferForm<'b> {
            newversion: bool,
            version: usize,
            me: OfferFormUser<'b>,
            them: OfferFormUser<'b>,
        }

        #[derive(Serialize, Debug)]
        struct TradeOfferCreateParams<'b> {
            trade_offer_access_token: &'b str,
        }

        offer.validate()?;

        let _guard = self.store.lock_shared().await;
        let session = self.store.require()?;
        let referer = match (offer.counter_offer_id, offer.token.as_deref()) {
            (Some(counter_offer_id), _) => {
                self.hosts.community_url(&format!("/tradeoffer/{counter_offer_id}/"))
            },
            (None, token) => offer_referer_url(
                &self.hosts.community_url("/tradeoffer/new/"),
                offer.partner,
                token,
            )?,
        };
        let json_tradeoffer = serde_json::to_string(&OfferForm {
            newversion: true,
            version: offer.items_to_give.len() + offer.items_to_receive.len() + 1,
            me: OfferFormUser {
                assets: &offer.items_to_give,
                currency: Vec::new(),
                ready: false,
            },
            them: OfferFormUser {
                assets: &offer.items_to_receive,
                currency: Vec::new(),
                ready: false,
            },
        })?;
        let mut params = vec![
            ("sessionid", session.sessionid.clone()),
            ("serverid", "1".to_string()),
            ("partner", u64::from(offer.partner).to_string()),
            ("tradeoffermessage", offer.message.clone().unwrap_or_default()),
            ("json_tradeoffer", json_tradeoffer),
            ("captcha", String::new()),
        ];

        if let Some(counter_offer_id) = offer.counter_offer_id {
            params.push(("tradeofferid_countered", counter_offer_id.to_string()));
        } else if let Some(token) = &offer.token {
            let trade_offer_create_params = serde_json::to_string(&TradeOfferCreateParams {
                trade_offer_access_token: token,
            })?;

            params.push(("trade_offer_create_params", trade_offer_create_params));
        }

        let uri = self.hosts.community_url("/tradeoffer/new/send");
        let response = self.client.post(&uri)
            .header(REFERER, referer)
            .form(&params)
            .send()
            .await?;
        let body: SendOfferResponse = parses_action_response(response).await?;
        let tradeofferid = body.tradeofferid
            .filter(|tradeofferid| *tradeofferid != 0)
            .ok_or(Error::InvalidResponse("Steam returned an offer ID of 0"))?;

        log::debug!("Sent offer {tradeofferid}");

        Ok(SentOffer {
            tradeofferid,
            needs_mobile_confirmation: body.needs_mobile_confirmation,
            needs_email_confirmation: body.needs_email_confirmation,
            email_domain: body.email_domain,
        })
    }

    /// Sends an offer, retrying according to `policy`. A retried send may create a duplicate
    /// offer if an earlier attempt reached Steam.
    pub async fn send_offer_with_retry(
        &self,
        offer: &NewTradeOffer,
        policy: &RetryPolicy,
    ) -> Result<SentOffer> {
        policy.execute(|| self.send_offer(offer)).await
    }

    /// Gets the escrow duration from a trade offer page.
    pub async fn get_escrow_duration(
        &self,
        target: &EscrowTarget,
    ) -> Result<EscrowDuration> {
        let _guard = self.store.lock_shared().await;

        self.store.require()?;

        let uri = match target {
            EscrowTarget::Partner { partner, token } => offer_referer_url(
                &self.hosts.community_url("/tradeoffer/new/"),
                *partner,
                token.as_deref(),
            )?,
            EscrowTarget::Offer(tradeofferid) => {
                self.hosts.community_url(&format!("/tradeoffer/{tradeofferid}/"))
            },
        };
        let response = self.client.get(&uri)
            .send()
            .await?;
        let body = check_response(response).await?;
        let html = String::from_utf8_lossy(&body);

        if let Some(error) = page_error(&html) {
            return Err(error);
        }

        Ok(parse_escrow_duration(&html)?)
    }

    /// Gets the escrow duration, retrying according to `policy`.
    pub async fn get_escrow_duration_with_retry(
        &self,
        target: &EscrowTarget,
        policy: &RetryPolicy,
    ) -> Result<EscrowDuration> {
        policy.execute(|| self.get_escrow_duration(target)).await
    }

    /// Gets the escrow duration for sending an offer to `partner`.
    pub async fn get_partner_escrow_duration(
        &self,
        partner: SteamID,
        token: Option<String>,
    ) -> Result<EscrowDuration> {
        self.get_escrow_duration(&EscrowTarget::Partner { partner, token }).await
    }

    /// Gets the escrow duration for an offer we received.
    pub async fn get_offer_escrow_duration(
        &self,
        tradeofferid: TradeOfferId,
    ) -> Result<EscrowDuration> {
        self.get_escrow_duration(&EscrowTarget::Offer(tradeofferid)).await
    }

    /// Gets the items received in a trade.
    pub async fn get_receipt(
        &self,
        tradeid: TradeId,
    ) -> Result<Vec<ReceiptItem>> {
        let _guard = self.store.lock_shared().await;

        self.store.require()?;

        let uri = self.hosts.community_url(&format!("/trade/{tradeid}/receipt"));
        let response = self.client.get(&uri)
            .send()
            .await?;
        let body = check_response(response).await?;
        let body = String::from_utf8_lossy(&body);

        if let Some(error) = page_error(&body) {
            Err(error)
        } else if let Some((_, script)) = regex_captures!(r#"(var oItem;[\s\S]*)</script>"#, &body) {
            Ok(parse_receipt_script(script)?)
        } else if regex_is_match!(r#"\{"success": ?false\}"#, &body) {
            Err(Error::NotLoggedIn)
        } else {
            Err(ParseHtmlError::NotFound("oItem").into())
        }
    }

    /// Gets the items received in a trade, retrying according to `policy`.
    pub async fn get_receipt_with_retry(
        &self,
        tradeid: TradeId,
        policy: &RetryPolicy,
    ) -> Result<Vec<ReceiptItem>> {
        policy.execute(|| self.get_receipt(tradeid)).await
    }

    async fn get_inventory_page(
        &self,
        steamid: SteamID,
        appid: AppId,
        contextid: ContextId,
        tradable_only: bool,
        start_assetid: Option<AssetId>,
    ) -> Result<InventoryPage<Asset, AssetId>> {
        let steamid = u64::from(steamid);
        let uri = self.hosts.community_url(&format!("/inventory/{steamid}/{appid}/{contextid}"));
        let referer = self.hosts.community_url(&format!("/profiles/{steamid}/inventory"));
        let mut query = vec![
            ("l", self.language.clone()),
            ("count", INVENTORY_PAGE_SIZE.to_string()),
        ];

        if let Some(start_assetid) = start_assetid {
            query.push(("start_assetid", start_assetid.to_string()));
        }

        let response = self.client.get(&uri)
            .header(REFERER, referer)
            .query(&query)
            .send()
            .await?;
        let body: GetInventoryResponse = parses_response(response).await?;

        if !body.success {
            return Err(Error::Response(body.error.unwrap_or_else(|| "Inventory request was unsuccessful".into())));
        }

        let items = if tradable_only {
            let tradable = body.descriptions
                .iter()
                .filter(|description| description.tradable)
                .map(|description| (description.classid, description.instanceid))
                .collect::<HashSet<_>>();

            body.assets
                .into_iter()
                .filter(|asset| tradable.contains(&(asset.classid, asset.instanceid)))
                .collect()
        } else {
            body.assets
        };

        Ok(InventoryPage {
            items,
            more_items: body.more_items,
            cursor: body.last_assetid,
        })
    }

    /// Gets every item in an inventory.
    pub async fn get_inventory(
        &self,
        steamid: SteamID,
        appid: AppId,
        contextid: ContextId,
        tradable_only: bool,
    ) -> Result<Vec<Asset>> {
        let _guard = self.store.lock_shared().await;

        fetch_all(|start_assetid| {
            self.get_inventory_page(steamid, appid, contextid, tradable_only, start_assetid)
        }).await
    }

    /// Gets every item in an inventory, retrying according to `policy`.
    pub async fn get_inventory_with_retry(
        &self,
        steamid: SteamID,
        appid: AppId,
        contextid: ContextId,
        tradable_only: bool,
        policy: &RetryPolicy,
    ) -> Result<Vec<Asset>> {
        policy.execute(|| self.get_inventory(steamid, appid, contextid, tradable_only)).await
    }

    async fn get_partner_inventory_page(
        &self,
        partner: SteamID,
        appid: AppId,
        contextid: ContextId,
        tradeofferid: Option<TradeOfferId>,
        start: Option<u32>,
    ) -> Result<InventoryPage<Asset, u32>> {
        let session = self.store.require()?;
        let pathname = match tradeofferid {
            Some(tradeofferid) => tradeofferid.to_string(),
            None => "new".into(),
        };
        let referer = offer_referer_url(
            &self.hosts.community_url(&format!("/tradeoffer/{pathname}/")),
            partner,
            None,
        )?;
        let uri = self.hosts.community_url(&format!("/tradeoffer/{pathname}/partnerinventory/"));
        let mut query = vec![
            ("sessionid", session.sessionid),
            ("partner", u64::from(partner).to_string()),
            ("appid", appid.to_string()),
            ("contextid", contextid.to_string()),
        ];

        if let Some(start) = start {
            query.push(("start", start.to_string()));
        }

        let response = self.client.get(&uri)
            .header(REFERER, referer)
            .query(&query)
            .send()
            .await?;
        let body: GetPartnerInventoryResponse = parses_response(response).await?;

        if !body.success {
            return Err(Error::Response(body.error.unwrap_or_else(|| "Inventory request was unsuccessful".into())));
        }

        Ok(InventoryPage {
            items: body.rg_inventory
                .into_iter()
                .map(|asset| asset.into_asset(appid, contextid))
                .collect(),
            more_items: body.more,
            cursor: body.more_start,
        })
    }

    /// Gets every item in a trade partner's inventory, as seen from a new offer or from the
    /// offer `tradeofferid`.
    pub async fn get_partner_inventory(
        &self,
        partner: SteamID,
        appid: AppId,
        contextid: ContextId,
        tradeofferid: Option<TradeOfferId>,
    ) -> Result<Vec<Asset>> {
        let _guard = self.store.lock_shared().await;

        fetch_all(|start| {
            self.get_partner_inventory_page(partner, appid, contextid, tradeofferid, start)
        }).await
    }

    /// Gets a trade partner's inventory, retrying according to `policy`.
    pub async fn get_partner_inventory_with_retry(
        &self,
        partner: SteamID,
        appid: AppId,
        contextid: ContextId,
        tradeofferid: Option<TradeOfferId>,
        policy: &RetryPolicy,
    ) -> Result<Vec<Asset>> {
        policy.execute(|| self.get_partner_inventory(partner, appid, contextid, tradeofferid)).await
    }
}

/// Reads a response from an endpoint that reports failures in `strError`, often with a 200
/// status. The embedded error takes precedence over the status.
async fn parses_action_response<D>(response: reqwest::Response) -> Result<D>
where
    D: DeserializeOwned,
{
    let status = response.status();
    let body = response.bytes().await?;

    if let Ok(StrErrorResponse { str_error: Some(message) }) = serde_json::from_slice(&body) {
        if !message.is_empty() {
            return Err(Error::Trade(TradeOfferError::from(message.as_str())));
        }
    }

    if status != StatusCode::OK {
        return Err(Error::Http(status));
    }

    parse_body(&body)
}
