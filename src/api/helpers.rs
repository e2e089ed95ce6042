use crate::error::{ParameterError, ParseHtmlError};
use crate::response::{EscrowDuration, ReceiptItem};
use steamid_ng::SteamID;
use lazy_regex::{regex, regex_captures};

/// A trade offer page URL with the partner's account ID and, if given, the access token in
/// the query string.
pub fn offer_referer_url(
    url: &str,
    partner: SteamID,
    token: Option<&str>,
) -> Result<String, ParameterError> {
    let mut params = vec![
        ("partner", partner.account_id().to_string()),
    ];

    if let Some(token) = token {
        params.push(("token", token.to_string()));
    }

    let url = reqwest::Url::parse_with_params(url, &params)?;

    Ok(url.into())
}

/// Reads the escrow days from a trade offer page.
pub fn parse_escrow_duration(
    body: &str,
) -> Result<EscrowDuration, ParseHtmlError> {
    let my_escrow_days = regex_captures!(r#"var g_daysMyEscrow = (\d+);"#, body)
        .ok_or(ParseHtmlError::NotFound("g_daysMyEscrow"))?
        .1
        .parse::<u32>()?;
    let their_escrow_days = regex_captures!(r#"var g_daysTheirEscrow = (\d+);"#, body)
        .ok_or(ParseHtmlError::NotFound("g_daysTheirEscrow"))?
        .1
        .parse::<u32>()?;

    Ok(EscrowDuration {
        my_escrow_days,
        their_escrow_days,
    })
}

/// Reads the items from the script on a trade receipt page.
pub fn parse_receipt_script(
    script: &str,
) -> Result<Vec<ReceiptItem>, ParseHtmlError> {
    regex!(r#"oItem\s*=\s*(\{.*\});\s*\n"#)
        .captures_iter(script)
        .map(|capture| if let Some(m) = capture.get(1) {
            let item = serde_json::from_str::<ReceiptItem>(m.as_str())?;

            Ok(item)
        } else {
            Err(ParseHtmlError::Malformed("Missing capture group in match"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_receipt_script_correctly() {
        let script = r#"
            oItem = {"id":"11292488054","owner":"0","amount":"1","classid":"101785959","instanceid":"11040578","name":"Mann Co. Supply Crate Key","market_hash_name":"Mann Co. Supply Crate Key","type":"Level 5 Tool","tradable":1,"marketable":1,"pos":1,"appid":440,"contextid":2};
            oItem.appid = 440;
            oItem.contextid = 2;
            BuildHover( 'item0', oItem, UserYou );
            oItem = {"id":"11292488061","owner":"0","amount":"1","classid":"101785959","instanceid":"0","name":"Mann Co. Supply Crate Key","market_hash_name":"Mann Co. Supply Crate Key","pos":2,"appid":440,"contextid":2};
            oItem.appid = 440;
        "#;
        let items = parse_receipt_script(script).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].assetid, 11292488054);
        assert_eq!(items[0].instanceid, Some(11040578));
        assert_eq!(items[1].instanceid, None);
        assert_eq!(items[1].market_hash_name, "Mann Co. Supply Crate Key");
    }

    #[test]
    fn parses_escrow_duration() {
        let body = r#"
            <script type="text/javascript">
                var g_daysMyEscrow = 0;
                var g_daysTheirEscrow = 15;
            </script>
        "#;
        let duration = parse_escrow_duration(body).unwrap();

        assert_eq!(duration.my_escrow_days, 0);
        assert_eq!(duration.their_escrow_days, 15);
    }

    #[test]
    fn missing_escrow_is_not_found() {
        let body = "var g_daysMyEscrow = 0;";

        assert!(matches!(
            parse_escrow_duration(body),
            Err(ParseHtmlError::NotFound("g_daysTheirEscrow")),
        ));
    }

    #[test]
    fn gets_offer_referer_url() {
        let partner = SteamID::from(76561198000000000);
        let url = offer_referer_url(
            "https://steamcommunity.com/tradeoffer/new/",
            partner,
            Some("token"),
        ).unwrap();

        assert_eq!(url, "https://steamcommunity.com/tradeoffer/new/?partner=39734272&token=token");

        let url = offer_referer_url(
            "https://steamcommunity.com/tradeoffer/new/",
            partner,
            None,
        ).unwrap();

        assert_eq!(url, "https://steamcommunity.com/tradeoffer/new/?partner=39734272");
    }
}
