//! Error types.

use crate::types::TradeOfferId;
use std::fmt;
use std::num::ParseIntError;
use reqwest::StatusCode;

/// Any range of errors encountered when making requests.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`]. Used by [`crate::RetryPolicy`] to decide whether a
/// failed operation is worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a usable response (connection failure, timeout, 5xx).
    Transport,
    /// Steam understood the request and rejected it.
    Protocol,
    /// The response did not have the expected shape.
    Parse,
    /// The caller violated a client-side contract. Never retried.
    Precondition,
    /// Login needs a two-factor code from the caller.
    TwoFactorRequired,
}

/// Any range of errors encountered when making requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An input parameter is missing or invalid.
    #[error("Invalid parameter: {}", .0)]
    Parameter(#[from] ParameterError),
    /// An unexpected response was received.
    #[error("Unexpected response: {}", .0)]
    Response(String),
    /// An error was encountered making a request.
    #[error("reqwest error: {}", .0)]
    Reqwest(#[from] reqwest::Error),
    /// An error was encountered within the request middleware.
    #[error("reqwest middleware error: {}", .0)]
    ReqwestMiddleware(anyhow::Error),
    /// An error was encountered parsing a JSON response body.
    #[error("Error parsing response: {}", .0)]
    Parse(#[from] serde_json::Error),
    /// An HTTP error.
    #[error("Error {}", .0)]
    Http(StatusCode),
    /// You are not logged in.
    #[error("Not logged in")]
    NotLoggedIn,
    /// An error was encountered parsing an HTML document.
    #[error("Error parsing HTML document: {}", .0)]
    Html(#[from] ParseHtmlError),
    /// The password could not be encrypted with the key Steam supplied.
    #[error("{}", .0)]
    Encrypt(#[from] EncryptError),
    /// A confirmation key or auth code could not be generated.
    #[error("{}", .0)]
    Totp(#[from] TotpError),
    /// The RSA key needed for login could not be fetched.
    #[error("Failed to fetch RSA key: {}", .0)]
    KeyFetch(KeyFetchError),
    /// Login succeeded partially and now needs a two-factor code.
    #[error("Login requires a two-factor code")]
    TwoFactorRequired,
    /// Steam rejected the login. Contains the message from Steam.
    #[error("Login failed: {}", .0)]
    LoginFailed(String),
    /// A trade offer action was rejected. Contains the message from Steam.
    #[error("Trade error: {}", .0)]
    Trade(TradeOfferError),
    /// Steam reported success but the response contents make no sense.
    #[error("Invalid response: {}", .0)]
    InvalidResponse(&'static str),
    /// Steam returned no offer for the requested ID.
    #[error("Steam returned an empty offer result")]
    EmptyOfferResult,
    /// Steam returned no response envelope when listing offers.
    #[error("Steam returned an empty offers result")]
    EmptyOffersResult,
    /// A confirmation was not successful. Contains the message from Steam when present.
    #[error("Confirmation unsuccessful: {}", .0.as_deref().unwrap_or("unknown reason"))]
    ConfirmationUnsuccessful(Option<String>),
    /// No confirmation could be found for the given offer.
    #[error("No confirmation for offer {}", .0)]
    NoConfirmationForOffer(TradeOfferId),
}

impl Error {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Reqwest(error) if error.is_decode() => ErrorKind::Parse,
            Self::Reqwest(error) if error.is_builder() => ErrorKind::Precondition,
            Self::Reqwest(_) |
            Self::ReqwestMiddleware(_) => ErrorKind::Transport,
            Self::Http(status) if is_transient_status(*status) => ErrorKind::Transport,
            Self::Http(_) => ErrorKind::Protocol,
            Self::Response(_) |
            Self::Parse(_) |
            Self::Html(_) |
            Self::Encrypt(EncryptError::KeyParse(_)) => ErrorKind::Parse,
            Self::Encrypt(EncryptError::Encryption(_)) => ErrorKind::Protocol,
            Self::KeyFetch(KeyFetchError::Request(error)) => error.kind(),
            Self::KeyFetch(KeyFetchError::Unsuccessful) => ErrorKind::Protocol,
            Self::TwoFactorRequired => ErrorKind::TwoFactorRequired,
            Self::LoginFailed(_) |
            Self::Trade(_) |
            Self::InvalidResponse(_) |
            Self::EmptyOfferResult |
            Self::EmptyOffersResult |
            Self::ConfirmationUnsuccessful(_) |
            Self::NoConfirmationForOffer(_) => ErrorKind::Protocol,
            Self::NotLoggedIn |
            Self::Parameter(_) |
            Self::Totp(_) => ErrorKind::Precondition,
        }
    }

    /// Whether another attempt at the same operation could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Parse)
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS ||
    status == StatusCode::REQUEST_TIMEOUT ||
    status.is_server_error()
}

impl From<reqwest_middleware::Error> for Error {
    fn from(error: reqwest_middleware::Error) -> Error {
        match error {
            reqwest_middleware::Error::Reqwest(e) => Error::Reqwest(e),
            reqwest_middleware::Error::Middleware(e) => Error::ReqwestMiddleware(e),
        }
    }
}

/// An invalid or missing parameter. These are programming errors on the caller's side and are
/// raised before any request is made.
#[derive(thiserror::Error, Debug)]
pub enum ParameterError {
    /// Neither sent nor received offers were requested.
    #[error("At least one of sent or received offers must be requested")]
    InvalidQuery,
    /// A retry policy was configured with zero attempts.
    #[error("Retry count must be more than 0")]
    InvalidRetryCount,
    /// A confirmation tag that is not one of allow, cancel, conf or details.
    #[error("Invalid confirmation tag: {}", .0)]
    InvalidTag(String),
    /// The trade offer contains no items.
    #[error("Cannot send an empty offer")]
    EmptyOffer,
    /// Account name or password was empty.
    #[error("Missing account name or password")]
    MissingCredentials,
    /// No identity secret was configured.
    #[error("No identity secret")]
    NoIdentitySecret,
    /// Neither an API key nor an access token is available.
    #[error("No API key or access token")]
    NoApiKeyOrAccessToken,
    /// The proxy URL could not be used.
    #[error("Invalid proxy: {}", .0)]
    InvalidProxy(reqwest::Error),
    /// A URL could not be parsed.
    #[error("{}", .0)]
    UrlParse(#[from] url::ParseError),
}

/// Errors from [`crate::crypto::encrypt_password`].
#[derive(thiserror::Error, Debug)]
pub enum EncryptError {
    /// The modulus or exponent is not valid hex.
    #[error("Invalid RSA key: {}", .0)]
    KeyParse(String),
    /// The encryption itself failed.
    #[error("Encryption failed: {}", .0)]
    Encryption(#[from] rsa::Error),
}

/// Errors generating codes from a secret.
#[derive(thiserror::Error, Debug)]
pub enum TotpError {
    /// The secret is not valid base64.
    #[error("Invalid secret: {}", .0)]
    InvalidSecret(#[from] base64::DecodeError),
    /// The decoded secret could not key the HMAC.
    #[error("Invalid secret length")]
    InvalidLength,
}

/// Failure fetching the login RSA key.
#[derive(thiserror::Error, Debug)]
pub enum KeyFetchError {
    /// The request itself failed.
    #[error("{0}")]
    Request(Box<Error>),
    /// Steam responded with `success: false`.
    #[error("Steam reported failure")]
    Unsuccessful,
}

/// An error parsing an HTML page.
#[derive(thiserror::Error, Debug)]
pub enum ParseHtmlError {
    /// The page does not have the expected structure.
    #[error("{}", .0)]
    Malformed(&'static str),
    /// A named field could not be found on the page.
    #[error("Field not found: {}", .0)]
    NotFound(&'static str),
    /// The page contains an error message.
    #[error("{}", .0)]
    Response(String),
    /// The number of confirmation entries does not match the number of descriptions.
    #[error("Found {} confirmation entries but {} descriptions", .entries, .descriptions)]
    ConfirmationCountMismatch {
        /// Number of entry nodes.
        entries: usize,
        /// Number of description nodes.
        descriptions: usize,
    },
    /// A selector failed to parse.
    #[error("Invalid selector")]
    ParseSelector,
    /// A number could not be parsed.
    #[error("{}", .0)]
    ParseInt(#[from] ParseIntError),
    /// Embedded JSON could not be parsed.
    #[error("{}", .0)]
    Json(#[from] serde_json::Error),
}

/// An error from a trade offer action. The message from Steam is kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOfferError {
    /// The message from Steam.
    pub message: String,
    /// The result code parsed from the trailing `(N)` of the message, if any.
    pub code: Option<TradeOfferErrorCode>,
}

impl fmt::Display for TradeOfferError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TradeOfferError {}

impl From<&str> for TradeOfferError {
    fn from(message: &str) -> Self {
        Self {
            message: message.trim().to_string(),
            code: parse_trailing_code(message).map(TradeOfferErrorCode::from_code),
        }
    }
}

fn parse_trailing_code(message: &str) -> Option<i32> {
    let code = message.trim().split(' ').next_back()?;
    let mut chars = code.chars();

    if chars.next() != Some('(') || chars.next_back() != Some(')') {
        return None;
    }

    chars.as_str().parse::<i32>().ok()
}

/// Known result codes embedded in trade offer error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeOfferErrorCode {
    /// Generic failure.
    Fail,
    /// The offer is not in a state where this action applies.
    InvalidState,
    /// Invalid trade access token.
    AccessDenied,
    /// Timed out.
    Timeout,
    /// Service unavailable. Also sent for a wrong context ID.
    ServiceUnavailable,
    /// Too many outstanding offers.
    LimitExceeded,
    /// An item is no longer in the inventory.
    Revoked,
    /// The offer was already accepted.
    AlreadyRedeemed,
    /// Any other code.
    Unknown(i32),
}

impl TradeOfferErrorCode {
    /// Maps a result code.
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => Self::Fail,
            11 => Self::InvalidState,
            15 => Self::AccessDenied,
            16 => Self::Timeout,
            20 => Self::ServiceUnavailable,
            25 => Self::LimitExceeded,
            26 => Self::Revoked,
            28 => Self::AlreadyRedeemed,
            other => Self::Unknown(other),
        }
    }

    /// The numeric result code.
    pub fn code(&self) -> i32 {
        match self {
            Self::Fail => 2,
            Self::InvalidState => 11,
            Self::AccessDenied => 15,
            Self::Timeout => 16,
            Self::ServiceUnavailable => 20,
            Self::LimitExceeded => 25,
            Self::Revoked => 26,
            Self::AlreadyRedeemed => 28,
            Self::Unknown(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trade_offer_error() {
        let message = "There was an error accepting this trade offer. Please try again later. (28)";
        let error = TradeOfferError::from(message);

        assert_eq!(error.code, Some(TradeOfferErrorCode::AlreadyRedeemed));
        assert_eq!(error.to_string(), message);
    }

    #[test]
    fn keeps_message_without_code() {
        let error = TradeOfferError::from("Something went wrong");

        assert_eq!(error.code, None);
        assert_eq!(error.message, "Something went wrong");
    }

    #[test]
    fn classifies_errors() {
        assert_eq!(Error::Http(StatusCode::BAD_GATEWAY).kind(), ErrorKind::Transport);
        assert_eq!(Error::Http(StatusCode::FORBIDDEN).kind(), ErrorKind::Protocol);
        assert_eq!(Error::Response("bad".into()).kind(), ErrorKind::Parse);
        assert_eq!(Error::Trade(TradeOfferError::from("x (15)")).kind(), ErrorKind::Protocol);
        assert_eq!(Error::NotLoggedIn.kind(), ErrorKind::Precondition);
        assert_eq!(Error::TwoFactorRequired.kind(), ErrorKind::TwoFactorRequired);
        assert!(!Error::Parameter(ParameterError::InvalidQuery).is_retryable());
        assert!(Error::Html(ParseHtmlError::Malformed("x")).is_retryable());
    }

    #[test]
    fn key_fetch_inherits_inner_kind() {
        let transport = Error::KeyFetch(KeyFetchError::Request(Box::new(Error::Http(StatusCode::SERVICE_UNAVAILABLE))));
        let rejected = Error::KeyFetch(KeyFetchError::Unsuccessful);

        assert_eq!(transport.kind(), ErrorKind::Transport);
        assert_eq!(rejected.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn key_fetch_messages() {
        let request = KeyFetchError::Request(Box::new(Error::NotLoggedIn));

        assert_eq!(request.to_string(), Error::NotLoggedIn.to_string());
        assert_eq!(KeyFetchError::Unsuccessful.to_string(), "Steam reported failure");
    }
}
