//! The API for mobile confirmations.
//!
//! Every request is signed with a confirmation key generated for the action being taken, using
//! the identity secret and Steam's clock. Confirmations are listed fresh on every call and are
//! answered with their ID and nonce exactly as received.

mod helpers;
mod response;

pub use response::ConfirmationListResponse;

use response::{AnswerResponse, DetailsResponse};
use crate::crypto::generate_device_id_from_steamid;
use crate::error::{Error, ParameterError, Result};
use crate::helpers::{check_response, parses_response, Hosts};
use crate::response::Confirmation;
use crate::retry::RetryPolicy;
use crate::session::SessionStore;
use crate::totp::{generate_confirmation_key, ServerClock, Tag};
use crate::types::{ConfirmationId, HttpClient};

const REQUESTED_WITH: &str = "com.valvesoftware.android.steam.community";

/// Lists and answers mobile confirmations.
#[derive(Debug, Clone)]
pub struct MobileAPI {
    client: HttpClient,
    store: SessionStore,
    hosts: Hosts,
    /// The identity secret for the account. Required for every request.
    identity_secret: Option<String>,
    /// Whether to list confirmations from the legacy markup page.
    legacy_confirmations: bool,
}

impl MobileAPI {
    pub fn new(
        client: HttpClient,
        store: SessionStore,
        hosts: Hosts,
        identity_secret: Option<String>,
        legacy_confirmations: bool,
    ) -> Self {
        Self {
            client,
            store,
            hosts,
            identity_secret,
            legacy_confirmations,
        }
    }

    fn get_confirmation_query_params(
        &self,
        tag: Tag,
    ) -> Result<Vec<(&'static str, String)>> {
        let identity_secret = self.identity_secret.as_ref()
            .ok_or(ParameterError::NoIdentitySecret)?;
        let session = self.store.require()?;
        let clock = ServerClock { time_offset: self.store.time_offset() };
        let (key, time) = generate_confirmation_key(identity_secret, tag, &clock)?;
        let device_id = session.device_id
            .unwrap_or_else(|| generate_device_id_from_steamid(session.steamid));
        let platform = if self.legacy_confirmations {
            "android"
        } else {
            "react"
        };

        Ok(vec![
            ("p", device_id),
            ("a", session.steamid.to_string()),
            ("k", key),
            ("t", time.to_string()),
            ("m", platform.into()),
            ("tag", tag.to_string()),
        ])
    }

    /// Gets the pending confirmations.
    pub async fn get_trade_confirmations(&self) -> Result<Vec<Confirmation>> {
        let pathname = if self.legacy_confirmations {
            "/mobileconf/conf"
        } else {
            "/mobileconf/getlist"
        };
        let _guard = self.store.lock_shared().await;
        let uri = self.hosts.community_url(pathname);
        let query = self.get_confirmation_query_params(Tag::Conf)?;

        log::debug!("Fetching confirmations from {uri}");

        let response = self.client.get(&uri)
            .header("X-Requested-With", REQUESTED_WITH)
            .query(&query)
            .send()
            .await?;
        let body = check_response(response).await?;

        ConfirmationListResponse::detect(&body)?.into_confirmations()
    }

    /// Gets the pending confirmations, retrying according to `policy`.
    pub async fn get_trade_confirmations_with_retry(
        &self,
        policy: &RetryPolicy,
    ) -> Result<Vec<Confirmation>> {
        policy.execute(|| self.get_trade_confirmations()).await
    }

    /// Answers a confirmation. Only [`Tag::Allow`] and [`Tag::Cancel`] answer a confirmation.
    pub async fn answer(
        &self,
        confirmation: &Confirmation,
        tag: Tag,
    ) -> Result<()> {
        self.send_confirmation_ajax(confirmation.id, confirmation.nonce, tag).await
    }

    /// Answers a confirmation, retrying according to `policy`.
    pub async fn answer_with_retry(
        &self,
        confirmation: &Confirmation,
        tag: Tag,
        policy: &RetryPolicy,
    ) -> Result<()> {
        policy.execute(|| self.answer(confirmation, tag)).await
    }

    /// Accepts a confirmation.
    pub async fn accept_confirmation(
        &self,
        confirmation: &Confirmation,
    ) -> Result<()> {
        self.answer(confirmation, Tag::Allow).await
    }

    /// Cancels a confirmation.
    pub async fn cancel_confirmation(
        &self,
        confirmation: &Confirmation,
    ) -> Result<()> {
        self.answer(confirmation, Tag::Cancel).await
    }

    /// Accepts a confirmation by ID.
    pub async fn accept_confirmation_by_id(
        &self,
        id: ConfirmationId,
        nonce: u64,
    ) -> Result<()> {
        self.send_confirmation_ajax(id, nonce, Tag::Allow).await
    }

    /// Cancels a confirmation by ID.
    pub async fn cancel_confirmation_by_id(
        &self,
        id: ConfirmationId,
        nonce: u64,
    ) -> Result<()> {
        self.send_confirmation_ajax(id, nonce, Tag::Cancel).await
    }

    /// Gets the HTML describing a confirmation.
    pub async fn get_trade_confirmation_details(
        &self,
        confirmation: &Confirmation,
    ) -> Result<String> {
        let _guard = self.store.lock_shared().await;
        let uri = self.hosts.community_url(&format!("/mobileconf/details/{}", confirmation.id));
        let query = self.get_confirmation_query_params(Tag::Details)?;
        let response = self.client.get(&uri)
            .header("X-Requested-With", REQUESTED_WITH)
            .query(&query)
            .send()
            .await?;
        let body: DetailsResponse = parses_response(response).await?;

        match body {
            DetailsResponse { success: true, html: Some(html) } => Ok(html),
            DetailsResponse { success: true, html: None } => {
                Err(Error::InvalidResponse("Confirmation details are missing HTML"))
            },
            DetailsResponse { success: false, .. } => Err(Error::ConfirmationUnsuccessful(None)),
        }
    }

    async fn send_confirmation_ajax(
        &self,
        id: ConfirmationId,
        nonce: u64,
        tag: Tag,
    ) -> Result<()> {
        if !matches!(tag, Tag::Allow | Tag::Cancel) {
            return Err(ParameterError::InvalidTag(tag.to_string()).into());
        }

        let _guard = self.store.lock_shared().await;
        let mut query = self.get_confirmation_query_params(tag)?;

        query.push(("op", tag.to_string()));
        query.push(("cid", id.to_string()));
        query.push(("ck", nonce.to_string()));

        let uri = self.hosts.community_url("/mobileconf/ajaxop");
        let response = self.client.get(&uri)
            .header("X-Requested-With", REQUESTED_WITH)
            .query(&query)
            .send()
            .await?;
        let body: AnswerResponse = parses_response(response).await?;

        if !body.success {
            return Err(Error::ConfirmationUnsuccessful(body.message));
        }

        log::debug!("Answered confirmation {id} with {tag}");

        Ok(())
    }
}
