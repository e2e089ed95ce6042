use super::helpers::parse_confirmations;
use crate::error::{Error, Result};
use crate::helpers::page_error;
use crate::response::Confirmation;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct ConfirmationListJson {
    pub success: bool,
    #[serde(default)]
    pub needauth: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub conf: Vec<Confirmation>,
}

/// The two shapes the confirmation list is served in.
#[derive(Debug)]
pub enum ConfirmationListResponse {
    /// The JSON list from `/mobileconf/getlist`.
    Json(ConfirmationListJson),
    /// The markup from the legacy `/mobileconf/conf` page.
    Markup(String),
}

impl ConfirmationListResponse {
    /// Picks the shape of `body`. A body that looks like JSON must parse as the JSON envelope,
    /// anything else is treated as markup.
    pub fn detect(body: &[u8]) -> Result<Self> {
        let looks_like_json = body
            .iter()
            .find(|byte| !byte.is_ascii_whitespace())
            .is_some_and(|byte| *byte == b'{' || *byte == b'[');

        if looks_like_json {
            return Ok(Self::Json(serde_json::from_slice::<ConfirmationListJson>(body)?));
        }

        Ok(Self::Markup(String::from_utf8_lossy(body).into_owned()))
    }

    pub fn into_confirmations(self) -> Result<Vec<Confirmation>> {
        match self {
            Self::Json(list) => {
                if list.needauth {
                    return Err(Error::NotLoggedIn);
                }

                if !list.success {
                    return Err(Error::ConfirmationUnsuccessful(list.message));
                }

                Ok(list.conf)
            },
            Self::Markup(html) => {
                if let Some(error) = page_error(&html) {
                    return Err(error);
                }

                Ok(parse_confirmations(&html)?)
            },
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct AnswerResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct DetailsResponse {
    pub success: bool,
    #[serde(default)]
    pub html: Option<String>,
}
