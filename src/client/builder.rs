use super::Client;
use crate::error::Result;
use crate::helpers::{ClientOptions, Hosts};
use std::time::Duration;

/// Builder for constructing a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    /// The Steam Web API key. The session's access token is used when not set.
    pub(crate) api_key: Option<String>,
    /// The identity secret for the account. Required for mobile confirmations.
    pub(crate) identity_secret: Option<String>,
    /// Seconds to add to local time to get Steam's time.
    pub(crate) time_offset: i64,
    /// Device ID to use instead of the one derived from the login credentials.
    pub(crate) device_id: Option<String>,
    /// The language for item descriptions.
    pub(crate) language: String,
    /// Cookies from a session established elsewhere.
    pub(crate) cookies: Option<Vec<String>>,
    /// List confirmations from the legacy markup page.
    pub(crate) legacy_confirmations: bool,
    pub(crate) hosts: Hosts,
    pub(crate) options: ClientOptions,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new [`ClientBuilder`].
    pub fn new() -> Self {
        Self {
            api_key: None,
            identity_secret: None,
            time_offset: 0,
            device_id: None,
            language: String::from("english"),
            cookies: None,
            legacy_confirmations: false,
            hosts: Hosts::default(),
            options: ClientOptions::default(),
        }
    }

    /// The Steam Web API key.
    pub fn api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// The identity secret for the account. Required for mobile confirmations.
    pub fn identity_secret(mut self, identity_secret: String) -> Self {
        self.identity_secret = Some(identity_secret);
        self
    }

    /// How many seconds your computer is behind Steam's servers. Call
    /// [`Client::sync_time_offset`] to measure it instead.
    pub fn time_offset(mut self, time_offset: i64) -> Self {
        self.time_offset = time_offset;
        self
    }

    pub fn device_id(mut self, device_id: String) -> Self {
        self.device_id = Some(device_id);
        self
    }

    pub fn language(mut self, language: String) -> Self {
        self.language = language;
        self
    }

    /// Cookies from a session established elsewhere, e.g. `"steamLoginSecure=..."`.
    pub fn cookies(mut self, cookies: Vec<String>) -> Self {
        self.cookies = Some(cookies);
        self
    }

    /// List confirmations from `/mobileconf/conf` instead of `/mobileconf/getlist`.
    pub fn legacy_confirmations(mut self, legacy_confirmations: bool) -> Self {
        self.legacy_confirmations = legacy_confirmations;
        self
    }

    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.options.user_agent = user_agent;
        self
    }

    /// An upstream proxy for every request. An invalid URL fails [`ClientBuilder::build`].
    pub fn proxy(mut self, proxy: String) -> Self {
        self.options.proxy = Some(proxy);
        self
    }

    /// Timeout for each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.options.connect_timeout = Some(connect_timeout);
        self
    }

    /// Base URL for steamcommunity.com requests.
    pub fn hostname(mut self, hostname: String) -> Self {
        self.hosts.community = hostname;
        self
    }

    /// Base URL for Steam Web API requests.
    pub fn api_hostname(mut self, api_hostname: String) -> Self {
        self.hosts.api = api_hostname;
        self
    }

    /// Builds the [`Client`].
    pub fn build(self) -> Result<Client> {
        Client::try_from(self)
    }
}
