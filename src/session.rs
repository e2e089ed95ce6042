//! Session state shared by every component of a [`crate::Client`].

use crate::error::{Error, ParameterError};
use crate::helpers::generate_sessionid;
use crate::time::server_time;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::atomic::{AtomicI64, Ordering};
use reqwest::cookie::{CookieStore, Jar};
use url::Url;

/// Session data from cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// The session ID.
    pub sessionid: String,
    /// The Steam ID of the user.
    pub steamid: u64,
    /// The device ID used for mobile confirmations.
    pub device_id: Option<String>,
    /// The account name used to log in.
    pub account_name: Option<String>,
    /// The `steamLogin` cookie value.
    pub steam_login: Option<String>,
    /// The `steamLoginSecure` cookie value.
    pub steam_login_secure: Option<String>,
    /// The access token embedded in `steamLoginSecure`, if any.
    pub access_token: Option<String>,
}

/// Holds the cookie jar, the session and the clock offset. Clones share the same state.
///
/// Requests using the session hold [`SessionStore::lock_shared`] while a login holds
/// [`SessionStore::lock_exclusive`], so requests may run alongside each other but never
/// alongside a login.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cookies: Arc<Jar>,
    session: Arc<RwLock<Option<Session>>>,
    time_offset: Arc<AtomicI64>,
    gate: Arc<async_std::sync::RwLock<()>>,
    url: Url,
}

impl SessionStore {
    /// Creates an empty store whose cookies are scoped to `community_url`.
    pub fn new(cookies: Arc<Jar>, community_url: &str) -> Result<Self, ParameterError> {
        Ok(Self {
            cookies,
            session: Arc::new(RwLock::new(None)),
            time_offset: Arc::new(AtomicI64::new(0)),
            gate: Arc::new(async_std::sync::RwLock::new(())),
            url: community_url.parse::<Url>()?,
        })
    }

    /// Waits until no login is in progress.
    pub async fn lock_shared(&self) -> async_std::sync::RwLockReadGuard<'_, ()> {
        self.gate.read().await
    }

    /// Waits until no request or other login is in progress.
    pub async fn lock_exclusive(&self) -> async_std::sync::RwLockWriteGuard<'_, ()> {
        self.gate.write().await
    }

    /// The cookie jar.
    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.cookies)
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.session.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.session.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the session.
    pub fn set_session(&self, session: Session) {
        *self.write() = Some(session);
    }

    /// A copy of the current session.
    pub fn session(&self) -> Option<Session> {
        self.read().clone()
    }

    /// The current session, failing with [`Error::NotLoggedIn`] when there is no session, the
    /// session ID is empty, or no cookies are held.
    pub fn require(&self) -> Result<Session, Error> {
        let session = self.session().ok_or(Error::NotLoggedIn)?;

        if session.sessionid.is_empty() || self.cookies().is_empty() {
            return Err(Error::NotLoggedIn);
        }

        Ok(session)
    }

    /// Adds cookie strings, e.g. `"sessionid=abc"`, to the jar.
    pub fn add_cookies(&self, cookies: &[String]) {
        for cookie_str in cookies {
            self.cookies.add_cookie_str(cookie_str, &self.url);
        }
    }

    /// The `name=value` pairs held for the community URL.
    pub fn cookies(&self) -> Vec<String> {
        let Some(header) = self.cookies.cookies(&self.url) else {
            return Vec::new();
        };
        let Ok(header) = header.to_str() else {
            return Vec::new();
        };

        header
            .split(';')
            .map(|pair| pair.trim())
            .filter(|pair| !pair.is_empty())
            .map(String::from)
            .collect()
    }

    /// The value of a cookie.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies()
            .into_iter()
            .find_map(|pair| {
                let (key, value) = pair.split_once('=')?;

                (key == name).then(|| value.to_string())
            })
    }

    /// Uses externally supplied cookies as the session. A `sessionid` cookie is generated when
    /// none is supplied. Waits for requests in progress and holds off new ones until the
    /// session is replaced.
    pub async fn set_cookies(
        &self,
        cookies: Vec<String>,
        device_id: Option<String>,
    ) -> Result<Session, Error> {
        let _guard = self.lock_exclusive().await;

        self.apply_cookies(cookies, device_id)
    }

    /// [`SessionStore::set_cookies`] without taking the gate. Only for stores nothing else is
    /// using yet.
    pub(crate) fn apply_cookies(
        &self,
        mut cookies: Vec<String>,
        device_id: Option<String>,
    ) -> Result<Session, Error> {
        let mut session = session_from_cookies(&cookies)?;

        if session.sessionid.is_empty() {
            session.sessionid = generate_sessionid();
            cookies.push(format!("sessionid={}", session.sessionid));
        }

        session.device_id = device_id;
        self.add_cookies(&cookies);
        self.set_session(session.clone());

        Ok(session)
    }

    /// Seconds to add to local time to get Steam's time.
    pub fn time_offset(&self) -> i64 {
        self.time_offset.load(Ordering::Relaxed)
    }

    pub fn set_time_offset(&self, time_offset: i64) {
        self.time_offset.store(time_offset, Ordering::Relaxed);
    }

    /// The current time on Steam's servers.
    pub fn server_time(&self) -> u64 {
        server_time(self.time_offset())
    }
}

fn cookie_pair(cookie: &str) -> Option<(&str, &str)> {
    let pair = cookie.split(';').next()?;

    pair.trim().split_once('=')
}

/// Splits a `steamLoginSecure` value into the Steam ID and the token following it.
pub(crate) fn parse_steam_login_secure(value: &str) -> Option<(u64, Option<String>)> {
    let decoded = value
        .replace("%7C", "|")
        .replace("%7c", "|");
    let (steamid, token) = match decoded.split_once("||") {
        Some((steamid, token)) => (steamid, Some(token.to_string())),
        None => (decoded.as_str(), None),
    };
    let steamid = steamid.parse::<u64>().ok()?;

    Some((steamid, token.filter(|token| !token.is_empty())))
}

fn session_from_cookies(cookies: &[String]) -> Result<Session, Error> {
    let mut session = Session::default();

    for (name, value) in cookies.iter().filter_map(|cookie| cookie_pair(cookie)) {
        match name {
            "sessionid" => session.sessionid = value.to_string(),
            "steamLogin" => session.steam_login = Some(value.to_string()),
            "steamLoginSecure" => {
                let (steamid, access_token) = parse_steam_login_secure(value)
                    .ok_or_else(|| Error::Response("Invalid steamLoginSecure cookie".into()))?;

                session.steamid = steamid;
                session.access_token = access_token;
                session.steam_login_secure = Some(value.to_string());
            },
            _ => {},
        }
    }

    if session.steamid == 0 {
        return Err(Error::NotLoggedIn);
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(Jar::default()), "https://steamcommunity.com").unwrap()
    }

    #[test]
    fn requires_session() {
        let store = store();

        assert!(matches!(store.require(), Err(Error::NotLoggedIn)));

        store.set_session(Session {
            steamid: 76561198000000000,
            ..Default::default()
        });

        assert!(matches!(store.require(), Err(Error::NotLoggedIn)));
    }

    #[test]
    fn sets_cookies_and_generates_sessionid() {
        let store = store();
        let session = store.apply_cookies(vec![
            "steamLoginSecure=76561198000000000%7C%7Ceyfaketoken".into(),
        ], None).unwrap();

        assert_eq!(session.steamid, 76561198000000000);
        assert_eq!(session.access_token.as_deref(), Some("eyfaketoken"));
        assert_eq!(session.sessionid.len(), 24);
        assert_eq!(store.cookie("sessionid"), Some(session.sessionid.clone()));
        assert!(store.require().is_ok());
    }

    #[test]
    fn keeps_supplied_sessionid() {
        let store = store();
        let session = store.apply_cookies(vec![
            "sessionid=37bf523a24034ec06c60ec61".into(),
            "steamLoginSecure=76561198000000000%7C%7Ctoken; Path=/".into(),
        ], Some("android:device".into())).unwrap();

        assert_eq!(session.sessionid, "37bf523a24034ec06c60ec61");
        assert_eq!(store.session().and_then(|session| session.device_id).as_deref(), Some("android:device"));
    }

    #[test]
    fn cookies_without_steamid_are_rejected() {
        let store = store();

        assert!(matches!(store.apply_cookies(vec!["sessionid=abc".into()], None), Err(Error::NotLoggedIn)));
    }

    #[tokio::test]
    async fn set_cookies_waits_for_requests_in_progress() {
        let store = store();
        let cookies = vec![
            "sessionid=37bf523a24034ec06c60ec61".to_string(),
            "steamLoginSecure=76561198000000000%7C%7Ctoken".to_string(),
        ];
        let request = store.lock_shared().await;
        let blocked = async_std::future::timeout(
            std::time::Duration::from_millis(50),
            store.set_cookies(cookies.clone(), None),
        ).await;

        assert!(blocked.is_err());
        assert!(store.session().is_none());

        drop(request);

        let session = store.set_cookies(cookies, Some("android:device".into())).await.unwrap();

        assert_eq!(session.device_id.as_deref(), Some("android:device"));
        assert_eq!(store.session(), Some(session));
    }
}
