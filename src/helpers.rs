use crate::error::{Error, ParameterError};
use std::sync::Arc;
use std::time::Duration;
use reqwest::{header, cookie::Jar};
use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use lazy_regex::{regex_is_match, regex_captures};

pub const COMMUNITY_HOSTNAME: &str = "https://steamcommunity.com";
pub const API_HOSTNAME: &str = "https://api.steampowered.com";
pub const USER_AGENT_STRING: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/97.0.4692.71 Safari/537.36";

/// Base URLs requests are made against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hosts {
    /// Base URL for steamcommunity.com pages.
    pub community: String,
    /// Base URL for the Steam Web API.
    pub api: String,
}

impl Default for Hosts {
    fn default() -> Self {
        Self {
            community: COMMUNITY_HOSTNAME.into(),
            api: API_HOSTNAME.into(),
        }
    }
}

impl Hosts {
    pub fn community_url(&self, pathname: &str) -> String {
        format!("{}{pathname}", self.community.trim_end_matches('/'))
    }

    pub fn api_url(&self, interface: &str, method: &str, version: u32) -> String {
        format!("{}/{interface}/{method}/v{version}/", self.api.trim_end_matches('/'))
    }
}

/// Transport settings fixed at construction.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub user_agent: String,
    pub proxy: Option<String>,
    pub timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: USER_AGENT_STRING.into(),
            proxy: None,
            timeout: None,
            connect_timeout: None,
        }
    }
}

/// Builds the client shared by every component. Every request carries the user agent and
/// `Accept: */*`, and reads and writes `cookies`.
pub fn get_default_client(
    cookies: Arc<Jar>,
    options: &ClientOptions,
) -> Result<ClientWithMiddleware, Error> {
    let mut headers = header::HeaderMap::new();
    let user_agent = header::HeaderValue::from_str(&options.user_agent)
        .unwrap_or_else(|_| header::HeaderValue::from_static(USER_AGENT_STRING));

    headers.insert(header::USER_AGENT, user_agent);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("*/*"));

    let mut builder = reqwest::ClientBuilder::new()
        .cookie_provider(cookies)
        .default_headers(headers);

    if let Some(proxy) = &options.proxy {
        let proxy = reqwest::Proxy::all(proxy)
            .map_err(ParameterError::InvalidProxy)?;

        builder = builder.proxy(proxy);
    }

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(connect_timeout) = options.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    let client = builder.build()?;

    Ok(reqwest_middleware::ClientBuilder::new(client).build())
}

fn is_login(location_option: Option<&header::HeaderValue>) -> bool {
    match location_option {
        Some(location) => {
            if let Ok(location_str) = location.to_str() {
                regex_is_match!("/login", location_str)
            } else {
                false
            }
        },
        None => false,
    }
}

pub async fn check_response(response: reqwest::Response) -> Result<bytes::Bytes, Error> {
    let status = &response.status();

    match status.as_u16() {
        300..=399 if is_login(response.headers().get("location")) => {
            Err(Error::NotLoggedIn)
        },
        400..=599 => {
            Err(Error::Http(*status))
        },
        _ => {
            Ok(response.bytes().await?)
        }
    }
}

/// Checks the response for errors, then parses the body as JSON. Bodies that are not JSON are
/// inspected for the error pages Steam serves in place of JSON.
pub async fn parses_response<D>(response: reqwest::Response) -> Result<D, Error>
where
    D: DeserializeOwned
{
    let body = check_response(response).await?;

    parse_body(&body)
}

pub fn parse_body<D>(body: &[u8]) -> Result<D, Error>
where
    D: DeserializeOwned
{
    match serde_json::from_slice::<D>(body) {
        Ok(body) => Ok(body),
        Err(parse_error) => {
            let html = String::from_utf8_lossy(body);

            if let Some(error) = page_error(&html) {
                Err(error)
            } else {
                Err(Error::Parse(parse_error))
            }
        }
    }
}

/// Detects the error pages Steam serves with a 200 status.
pub fn page_error(html: &str) -> Option<Error> {
    if regex_is_match!(r#"<h1>Sorry!</h1>"#, html) {
        if let Some((_, message)) = regex_captures!("<h3>(.+)</h3>", html) {
            Some(Error::Response(message.into()))
        } else {
            Some(Error::Response("Unexpected error".into()))
        }
    } else if regex_is_match!(r#"<h1>Sign In</h1>"#, html) && regex_is_match!(r#"g_steamID = false;"#, html) {
        Some(Error::NotLoggedIn)
    } else if let Some((_, message)) = regex_captures!(r#"<div id="error_msg">\s*([^<]+)\s*</div>"#, html) {
        Some(Error::Trade(message.trim().into()))
    } else {
        None
    }
}

/// Generates a random session ID.
pub fn generate_sessionid() -> String {
    // Should look like "37bf523a24034ec06c60ec61"
    (0..12)
        .map(|_| {
            let b = rand::random::<u8>();

            format!("{b:02x}")
        })
        .collect()
}
