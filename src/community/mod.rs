//! Logging in to steamcommunity.com.
//!
//! Login runs in three steps: the account's RSA key is fetched, the password is encrypted with
//! it, and the encrypted credentials are submitted along with a two-factor code. Steam answers
//! with cookies that make up the [`Session`].

mod response;

use response::{LoginResponse, QueryTimeResponse, RsaKeyResponse};
use crate::crypto::{encrypt_password, generate_device_id};
use crate::error::{Error, KeyFetchError, Result};
use crate::helpers::{generate_sessionid, parses_response, Hosts};
use crate::request::LoginDetails;
use crate::session::{parse_steam_login_secure, Session, SessionStore};
use crate::time::{get_system_time, get_system_time_millis};
use crate::totp::{generate_auth_code, ServerClock};
use crate::types::HttpClient;
use std::sync::{Arc, RwLock};

/// Where a login attempt is at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginState {
    /// No login has completed.
    #[default]
    Unauthenticated,
    /// The RSA key was fetched.
    KeyFetched,
    /// Encrypted credentials were submitted.
    CredentialSubmitted,
    /// Login completed and the session is stored.
    Authenticated,
    /// Steam asked for a two-factor code.
    TwoFactorRequired,
    /// The last login attempt failed.
    Failed,
}

/// The RSA key Steam encrypts the password with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKey {
    /// Modulus in hex.
    pub modulus: String,
    /// Exponent in hex.
    pub exponent: String,
    /// Timestamp sent back with the login.
    pub timestamp: String,
}

/// Performs logins and keeps the clock offset in sync.
#[derive(Debug, Clone)]
pub struct SteamCommunity {
    client: HttpClient,
    store: SessionStore,
    hosts: Hosts,
    device_id: Option<String>,
    state: Arc<RwLock<LoginState>>,
}

impl SteamCommunity {
    /// Creates a new [`SteamCommunity`]. When `device_id` is given it is used instead of the one
    /// derived from the credentials.
    pub fn new(
        client: HttpClient,
        store: SessionStore,
        hosts: Hosts,
        device_id: Option<String>,
    ) -> Self {
        Self {
            client,
            store,
            hosts,
            device_id,
            state: Arc::new(RwLock::new(LoginState::Unauthenticated)),
        }
    }

    /// The state of the last login.
    pub fn login_state(&self) -> LoginState {
        *self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_login_state(&self, state: LoginState) {
        *self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }

    /// Fetches the RSA key for `account_name`.
    pub async fn get_rsa_key(&self, account_name: &str) -> Result<RsaKey> {
        let uri = self.hosts.community_url("/login/getrsakey/");
        let response = self.client.post(&uri)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Origin", self.hosts.community.as_str())
            .header("Referer", self.hosts.community_url("/login"))
            .form(&[("username", account_name)])
            .send()
            .await
            .map_err(|error| KeyFetchError::Request(Box::new(error.into())))
            .map_err(Error::KeyFetch)?;
        let body: RsaKeyResponse = parses_response(response).await
            .map_err(|error| Error::KeyFetch(KeyFetchError::Request(Box::new(error))))?;

        if !body.success {
            return Err(Error::KeyFetch(KeyFetchError::Unsuccessful));
        }

        Ok(RsaKey {
            modulus: body.publickey_mod,
            exponent: body.publickey_exp,
            timestamp: body.timestamp,
        })
    }

    /// Logs in. Waits for requests in progress to finish and holds off new ones until the login
    /// completes. On success the session is stored and returned.
    pub async fn login(&self, details: &LoginDetails) -> Result<Session> {
        details.validate()?;

        let _guard = self.store.lock_exclusive().await;

        self.set_login_state(LoginState::Unauthenticated);

        match self.do_login(details).await {
            Ok(session) => {
                self.set_login_state(LoginState::Authenticated);
                log::info!("Logged in as {} ({})", details.account_name, session.steamid);
                Ok(session)
            },
            Err(Error::TwoFactorRequired) => {
                self.set_login_state(LoginState::TwoFactorRequired);
                Err(Error::TwoFactorRequired)
            },
            Err(error) => {
                self.set_login_state(LoginState::Failed);
                log::warn!("Login failed for {}: {error}", details.account_name);
                Err(error)
            },
        }
    }

    fn two_factor_code(&self, details: &LoginDetails) -> Result<String> {
        if let Some(code) = details.two_factor_code.as_deref() {
            return Ok(code.to_string());
        }

        if let Some(shared_secret) = details.shared_secret.as_deref() {
            let clock = ServerClock { time_offset: self.store.time_offset() };

            return Ok(generate_auth_code(shared_secret, &clock)?);
        }

        Ok(String::new())
    }

    async fn do_login(&self, details: &LoginDetails) -> Result<Session> {
        let key = self.get_rsa_key(&details.account_name).await?;

        self.set_login_state(LoginState::KeyFetched);

        let password = encrypt_password(&key.modulus, &key.exponent, &details.password)?;
        let two_factor_code = self.two_factor_code(details)?;
        let donotcache = get_system_time_millis().to_string();
        let params = [
            ("captcha_text", ""),
            ("captchagid", "-1"),
            ("emailauth", ""),
            ("emailsteamid", ""),
            ("password", password.as_str()),
            ("remember_login", "true"),
            ("rsatimestamp", key.timestamp.as_str()),
            ("twofactorcode", two_factor_code.as_str()),
            ("username", details.account_name.as_str()),
            ("loginfriendlyname", ""),
            ("donotcache", donotcache.as_str()),
        ];
        let uri = self.hosts.community_url("/login/dologin/");
        let response = self.client.post(&uri)
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Origin", self.hosts.community.as_str())
            .header("Referer", self.hosts.community_url("/login"))
            .form(&params)
            .send()
            .await?;

        self.set_login_state(LoginState::CredentialSubmitted);

        let body: LoginResponse = parses_response(response).await?;

        if !body.success {
            if body.requires_twofactor {
                return Err(Error::TwoFactorRequired);
            }

            return Err(Error::LoginFailed(body.message));
        }

        let sessionid = generate_sessionid();

        self.store.add_cookies(&[format!("sessionid={sessionid}")]);

        let steam_login = self.store.cookie("steamLogin");
        let steam_login_secure = self.store.cookie("steamLoginSecure");
        let from_cookie = steam_login_secure
            .as_deref()
            .and_then(parse_steam_login_secure);
        let steamid = body.transfer_parameters
            .and_then(|params| params.steamid)
            .and_then(|steamid| steamid.parse::<u64>().ok())
            .or_else(|| from_cookie.as_ref().map(|(steamid, _)| *steamid))
            .ok_or(Error::InvalidResponse("Login response is missing a Steam ID"))?;
        let device_id = self.device_id
            .clone()
            .unwrap_or_else(|| generate_device_id(&details.account_name, &details.password));
        let session = Session {
            sessionid,
            steamid,
            device_id: Some(device_id),
            account_name: Some(details.account_name.clone()),
            steam_login,
            steam_login_secure,
            access_token: from_cookie.and_then(|(_, token)| token),
        };

        self.store.set_session(session.clone());

        Ok(session)
    }

    /// Queries Steam's clock and stores the difference to the local clock. Returns the offset in
    /// seconds.
    pub async fn sync_time_offset(&self) -> Result<i64> {
        let uri = self.hosts.api_url("ITwoFactorService", "QueryTime", 1);
        let response = self.client.post(&uri)
            .header("Content-Length", "0")
            .send()
            .await?;
        let body: QueryTimeResponse = parses_response(response).await?;
        let time_offset = body.response.server_time - get_system_time() as i64;

        log::debug!("Server time offset is {time_offset}s");
        self.store.set_time_offset(time_offset);

        Ok(time_offset)
    }
}
