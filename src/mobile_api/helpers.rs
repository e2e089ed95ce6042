use crate::enums::ConfirmationType;
use crate::error::ParseHtmlError;
use crate::response::Confirmation;
use scraper::{Html, Selector, element_ref::ElementRef};

fn selector(selectors: &str) -> Result<Selector, ParseHtmlError> {
    Selector::parse(selectors).map_err(|_e| ParseHtmlError::ParseSelector)
}

fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses the confirmation list served by the legacy `/mobileconf/conf` page.
pub fn parse_confirmations(text: &str) -> Result<Vec<Confirmation>, ParseHtmlError> {
    fn parse_entry(
        element: ElementRef,
        description_selector: &Selector,
        line_selector: &Selector,
        icon_selector: &Selector,
    ) -> Result<Confirmation, ParseHtmlError> {
        let description = element.select(description_selector).next()
            .ok_or(ParseHtmlError::Malformed("Description is missing from confirmation"))?;
        let data_type = element.value().attr("data-type")
            .ok_or(ParseHtmlError::NotFound("data-type"))?;
        let id = element.value().attr("data-confid")
            .ok_or(ParseHtmlError::NotFound("data-confid"))?;
        let key = element.value().attr("data-key")
            .ok_or(ParseHtmlError::NotFound("data-key"))?;
        let creator = element.value().attr("data-creator")
            .ok_or(ParseHtmlError::NotFound("data-creator"))?;
        let mut lines = description.select(line_selector)
            .map(element_text)
            .filter(|line| !line.is_empty());
        let headline = lines.next()
            .unwrap_or_else(|| element_text(description));
        let summary = lines.collect::<Vec<_>>();
        let icon = element.select(icon_selector).next()
            .and_then(|img| img.value().attr("src"))
            .map(String::from);

        Ok(Confirmation {
            id: id.parse::<u64>()?,
            nonce: key.parse::<u64>()?,
            creator_id: creator.parse::<u64>()?,
            conf_type: ConfirmationType::from(data_type),
            type_name: String::new(),
            headline,
            summary,
            creation_time: None,
            icon,
        })
    }

    let fragment = Html::parse_fragment(text);
    let mobileconf_empty_selector = selector("#mobileconf_empty")?;
    let mobileconf_done_selector = selector(".mobileconf_done")?;

    if let Some(element) = fragment.select(&mobileconf_empty_selector).next() {
        if mobileconf_done_selector.matches(&element) {
            // the first line is a heading, the second the message
            if let Some(element) = element.children().filter_map(ElementRef::wrap).nth(1) {
                let error_message = element_text(element);

                return Err(ParseHtmlError::Response(error_message));
            }
        }

        return Ok(Vec::new());
    }

    let entry_selector = selector(".mobileconf_list_entry")?;
    let description_selector = selector(".mobileconf_list_entry_description")?;
    let line_selector = selector(".mobileconf_list_entry_description > div")?;
    let icon_selector = selector(".mobileconf_list_entry_icon img")?;
    let entries = fragment.select(&entry_selector).collect::<Vec<_>>();
    let descriptions = fragment.select(&description_selector).count();

    if entries.is_empty() && descriptions == 0 {
        return Err(ParseHtmlError::NotFound("mobileconf_list_entry"));
    }

    if entries.len() != descriptions {
        return Err(ParseHtmlError::ConfirmationCountMismatch {
            entries: entries.len(),
            descriptions,
        });
    }

    entries
        .into_iter()
        .map(|entry| parse_entry(entry, &description_selector, &line_selector, &icon_selector))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = r#"
        <div class="mobileconf_list_entry" id="conf13799599785" data-confid="13799599785" data-key="9141945700999917347" data-type="2" data-creator="5127445123" data-cancel="Cancel" data-accept="Send Offer">
            <div class="mobileconf_list_entry_content">
                <div class="mobileconf_list_entry_icon">
                    <div class="playerAvatar offline"><img src="https://avatars.akamai.steamstatic.com/icon.jpg"></div>
                </div>
                <div class="mobileconf_list_entry_description">
                    <div>Trade with someone</div>
                    <div>Mann Co. Supply Crate Key</div>
                    <div>Just now</div>
                </div>
            </div>
        </div>
    "#;

    #[test]
    fn parses_entries() {
        let confirmations = parse_confirmations(ENTRY).unwrap();
        let confirmation = &confirmations[0];

        assert_eq!(confirmations.len(), 1);
        assert_eq!(confirmation.id, 13799599785);
        assert_eq!(confirmation.nonce, 9141945700999917347);
        assert_eq!(confirmation.creator_id, 5127445123);
        assert_eq!(confirmation.conf_type, ConfirmationType::Trade);
        assert_eq!(confirmation.headline, "Trade with someone");
        assert_eq!(confirmation.summary, vec!["Mann Co. Supply Crate Key", "Just now"]);
        assert_eq!(confirmation.icon.as_deref(), Some("https://avatars.akamai.steamstatic.com/icon.jpg"));
    }

    #[test]
    fn empty_list() {
        let html = r#"<div id="mobileconf_empty" class="mobileconf_done">
            <div>Nothing to confirm</div>
        </div>"#;

        assert!(parse_confirmations(html).unwrap().is_empty());
    }

    #[test]
    fn empty_list_with_error() {
        let html = r#"<div id="mobileconf_empty" class="mobileconf_done">
            <div>Oh nooooooes!</div>
            <div>Invalid authenticator</div>
        </div>"#;

        assert!(matches!(
            parse_confirmations(html),
            Err(ParseHtmlError::Response(message)) if message == "Invalid authenticator",
        ));
    }

    #[test]
    fn count_mismatch() {
        let html = r#"
            <div class="mobileconf_list_entry" data-confid="1" data-key="2" data-type="2" data-creator="3">
                <div class="mobileconf_list_entry_description"><div>Trade</div></div>
            </div>
            <div class="mobileconf_list_entry" data-confid="4" data-key="5" data-type="2" data-creator="6"></div>
        "#;

        assert!(matches!(
            parse_confirmations(html),
            Err(ParseHtmlError::ConfirmationCountMismatch { entries: 2, descriptions: 1 }),
        ));
    }

    #[test]
    fn page_without_list_is_an_error() {
        let html = r#"<div class="profile_header">Someone</div>"#;

        assert!(matches!(
            parse_confirmations(html),
            Err(ParseHtmlError::NotFound("mobileconf_list_entry")),
        ));
    }

    #[test]
    fn missing_attribute() {
        let html = r#"
            <div class="mobileconf_list_entry" data-confid="1" data-type="2" data-creator="3">
                <div class="mobileconf_list_entry_description"><div>Trade</div></div>
            </div>
        "#;

        assert!(matches!(parse_confirmations(html), Err(ParseHtmlError::NotFound("data-key"))));
    }
}
