use steam_trade_session::{Client, Error, GetTradeOffersOptions, NewTradeOffer, RetryPolicy, SteamID};
use steam_trade_session::enums::TradeOfferState;
use steam_trade_session::error::{ParameterError, TradeOfferErrorCode};
use steam_trade_session::request::NewTradeOfferItem;
use std::time::Duration;
use serde_json::json;
use wiremock::{Mock, MockServer, ResponseTemplate};
use wiremock::matchers::{body_string_contains, header, method, path, query_param, query_param_is_missing};

const PARTNER: u64 = 76561198000000001;

fn client(server: &MockServer) -> Client {
    Client::builder()
        .hostname(server.uri())
        .api_hostname(server.uri())
        .api_key("key".into())
        .cookies(vec![
            "sessionid=37bf523a24034ec06c60ec61".into(),
            "steamLoginSecure=76561198000000000%7C%7Ctoken".into(),
        ])
        .build()
        .unwrap()
}

fn raw_offer(tradeofferid: &str) -> serde_json::Value {
    json!({
        "tradeofferid": tradeofferid,
        "accountid_other": 39734273,
        "message": "",
        "expiration_time": 1650000000,
        "time_created": 1648790400,
        "time_updated": 1648790400,
        "trade_offer_state": 2,
        "items_to_receive": [{
            "appid": 440,
            "contextid": "2",
            "assetid": "11152148507",
            "classid": "101785959",
            "instanceid": "11040578",
            "amount": "1",
        }],
        "is_our_offer": false,
        "escrow_end_date": 0,
        "confirmation_method": 0,
    })
}

fn new_offer() -> NewTradeOffer {
    NewTradeOffer::builder(SteamID::from(PARTNER))
        .items_to_give([NewTradeOfferItem {
            appid: 440,
            contextid: 2,
            assetid: 11152148507,
            amount: 1,
        }])
        .build()
}

#[tokio::test]
async fn gets_trade_offer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/IEconService/GetTradeOffer/v1/"))
        .and(query_param("key", "key"))
        .and(query_param("tradeofferid", "5127445123"))
        .and(query_param("language", "english"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "offer": raw_offer("5127445123") },
        })))
        .mount(&server)
        .await;

    let offer = client(&server).api.get_trade_offer(5127445123).await.unwrap();

    assert_eq!(offer.tradeofferid, 5127445123);
    assert_eq!(u64::from(offer.partner), PARTNER);
    assert_eq!(offer.trade_offer_state, TradeOfferState::Active);
    assert_eq!(offer.items_to_receive.len(), 1);
}

#[tokio::test]
async fn missing_offer_is_an_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/IEconService/GetTradeOffer/v1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": {} })))
        .mount(&server)
        .await;

    let result = client(&server).api.get_trade_offer(1).await;

    assert!(matches!(result, Err(Error::EmptyOfferResult)));
}

#[tokio::test]
async fn uses_access_token_without_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/IEconService/GetTradeOffer/v1/"))
        .and(query_param("access_token", "token"))
        .and(query_param_is_missing("key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "offer": raw_offer("1") },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_hostname(server.uri())
        .cookies(vec!["steamLoginSecure=76561198000000000%7C%7Ctoken".into()])
        .build()
        .unwrap();

    client.api.get_trade_offer(1).await.unwrap();
}

#[tokio::test]
async fn requires_api_key_or_access_token() {
    let server = MockServer::start().await;
    let client = Client::builder()
        .api_hostname(server.uri())
        .build()
        .unwrap();
    let result = client.api.get_trade_offer(1).await;

    assert!(matches!(result, Err(Error::Parameter(ParameterError::NoApiKeyOrAccessToken))));
}

#[tokio::test]
async fn follows_offers_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/IEconService/GetTradeOffers/v1/"))
        .and(query_param("get_received_offers", "1"))
        .and(query_param("active_only", "1"))
        .and(query_param_is_missing("get_sent_offers"))
        .and(query_param_is_missing("cursor"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "trade_offers_received": [raw_offer("1")],
                "next_cursor": 100,
            },
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/IEconService/GetTradeOffers/v1/"))
        .and(query_param("cursor", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "trade_offers_received": [raw_offer("2")],
                "next_cursor": 0,
            },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = GetTradeOffersOptions::new()
        .sent(false)
        .received(true)
        .active_only(true);
    let offers = client(&server).api.get_trade_offers(&options).await.unwrap();
    let tradeofferids = offers.received
        .iter()
        .map(|offer| offer.tradeofferid)
        .collect::<Vec<_>>();

    assert_eq!(tradeofferids, vec![1, 2]);
    assert!(offers.sent.is_empty());
}

#[tokio::test]
async fn missing_offers_response_is_an_empty_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/IEconService/GetTradeOffers/v1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let options = GetTradeOffersOptions::new();
    let result = client(&server).api.get_trade_offers(&options).await;

    assert!(matches!(result, Err(Error::EmptyOffersResult)));
}

#[tokio::test]
async fn offers_query_needs_sent_or_received() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/IEconService/GetTradeOffers/v1/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let options = GetTradeOffersOptions::new()
        .sent(false)
        .received(false);
    let result = client(&server).api.get_trade_offers(&options).await;

    assert!(matches!(result, Err(Error::Parameter(ParameterError::InvalidQuery))));
}

#[tokio::test]
async fn retries_transient_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/IEconService/GetTradeOffer/v1/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/IEconService/GetTradeOffer/v1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": { "offer": raw_offer("1") },
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policy = RetryPolicy::new(3, Duration::ZERO);
    let offer = client(&server).api.get_trade_offer_with_retry(1, &policy).await.unwrap();

    assert_eq!(offer.tradeofferid, 1);
}

#[tokio::test]
async fn declines_offer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/IEconService/DeclineTradeOffer/v1/"))
        .and(body_string_contains("tradeofferid=5127445123"))
        .and(body_string_contains("key=key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": {} })))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).api.decline_offer(5127445123).await.unwrap();
}

#[tokio::test]
async fn accepts_offer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tradeoffer/5127445123/accept"))
        .and(body_string_contains("sessionid=37bf523a24034ec06c60ec61"))
        .and(body_string_contains("serverid=1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tradeid": "4321",
            "needs_mobile_confirmation": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let accepted = client(&server).api.accept_offer(5127445123).await.unwrap();

    assert_eq!(accepted.tradeid, Some(4321));
    assert!(accepted.needs_mobile_confirmation);
}

#[tokio::test]
async fn trade_errors_are_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tradeoffer/5127445123/accept"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "strError": "There was an error accepting this trade offer.  Please try again later. (26)",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let policy = RetryPolicy::new(3, Duration::ZERO);
    let result = client(&server).api.accept_offer_with_retry(5127445123, &policy).await;

    assert!(matches!(
        result,
        Err(Error::Trade(error)) if error.code == Some(TradeOfferErrorCode::Revoked),
    ));
}

#[tokio::test]
async fn sends_offer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tradeoffer/new/send"))
        .and(header("Referer", format!("{}/tradeoffer/new/?partner=39734273&token=abcdefgh", server.uri()).as_str()))
        .and(body_string_contains("partner=76561198000000001"))
        .and(body_string_contains("trade_offer_create_params"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tradeofferid": "5127445123",
            "needs_mobile_confirmation": true,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut offer = new_offer();

    offer.token = Some("abcdefgh".into());

    let sent = client(&server).api.send_offer(&offer).await.unwrap();

    assert_eq!(sent.tradeofferid, 5127445123);
    assert!(sent.needs_mobile_confirmation);
}

#[tokio::test]
async fn sends_counter_offer() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tradeoffer/new/send"))
        .and(body_string_contains("tradeofferid_countered=1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tradeofferid": "5127445124",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut offer = new_offer();

    offer.counter_offer_id = Some(1234);

    let sent = client(&server).api.send_offer(&offer).await.unwrap();

    assert_eq!(sent.tradeofferid, 5127445124);
}

#[tokio::test]
async fn zero_offer_id_is_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tradeoffer/new/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "strError": "",
            "tradeofferid": "0",
        })))
        .mount(&server)
        .await;

    let result = client(&server).api.send_offer(&new_offer()).await;

    assert!(matches!(result, Err(Error::InvalidResponse(_))));
}

#[tokio::test]
async fn empty_offer_is_not_sent() {
    let server = MockServer::start().await;
    let offer = NewTradeOffer::builder(SteamID::from(PARTNER)).build();
    let result = client(&server).api.send_offer(&offer).await;

    assert!(matches!(result, Err(Error::Parameter(ParameterError::EmptyOffer))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn gets_offer_escrow_duration() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tradeoffer/5127445123/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<html><script>
            var g_daysMyEscrow = 0;
            var g_daysTheirEscrow = 15;
        </script></html>"#))
        .mount(&server)
        .await;

    let escrow = client(&server).api.get_offer_escrow_duration(5127445123).await.unwrap();

    assert_eq!(escrow.my_escrow_days, 0);
    assert_eq!(escrow.their_escrow_days, 15);
    assert!(escrow.has_escrow());
}

#[tokio::test]
async fn escrow_page_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tradeoffer/new/"))
        .and(query_param("partner", "39734273"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><h1>Sorry!</h1><h3>This trade offer is no longer valid.</h3></html>",
        ))
        .mount(&server)
        .await;

    let result = client(&server).api
        .get_partner_escrow_duration(SteamID::from(PARTNER), None)
        .await;

    assert!(matches!(
        result,
        Err(Error::Response(message)) if message == "This trade offer is no longer valid.",
    ));
}

#[tokio::test]
async fn pages_through_inventory() {
    let server = MockServer::start().await;
    let inventory_path = "/inventory/76561198000000001/440/2";

    Mock::given(method("GET"))
        .and(path(inventory_path))
        .and(query_param("count", "2000"))
        .and(query_param_is_missing("start_assetid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "more_items": 1,
            "last_assetid": "1",
            "assets": [
                {"appid": 440, "contextid": "2", "assetid": "1", "classid": "10", "instanceid": "0", "amount": "1"},
            ],
            "descriptions": [
                {"appid": 440, "classid": "10", "instanceid": "0", "tradable": 1},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(inventory_path))
        .and(query_param("start_assetid", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "assets": [
                {"appid": 440, "contextid": "2", "assetid": "2", "classid": "11", "instanceid": "0", "amount": "1"},
            ],
            "descriptions": [
                {"appid": 440, "classid": "11", "instanceid": "0", "tradable": 0},
            ],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let assets = client(&server).api
        .get_inventory(SteamID::from(PARTNER), 440, 2, true)
        .await
        .unwrap();

    assert_eq!(assets.len(), 1);
    assert_eq!(assets[0].assetid, 1);
}

#[tokio::test]
async fn gets_receipt() {
    let server = MockServer::start().await;
    let html = r#"<html><body><script type="text/javascript">
        var oItem;
        oItem = {"id":"11292488054","owner":"0","amount":"1","classid":"101785959","instanceid":"11040578","name":"Mann Co. Supply Crate Key","market_hash_name":"Mann Co. Supply Crate Key","appid":440,"contextid":2};
        oItem.appid = 440;
        BuildHover( 'item0', oItem, UserYou );
    </script></body></html>"#;

    Mock::given(method("GET"))
        .and(path("/trade/4321/receipt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server).api.get_receipt(4321).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].assetid, 11292488054);
    assert_eq!(items[0].instanceid, Some(11040578));
    assert_eq!(items[0].market_hash_name, "Mann Co. Supply Crate Key");
}

#[tokio::test]
async fn pages_through_partner_inventory() {
    let server = MockServer::start().await;
    let inventory_path = "/tradeoffer/new/partnerinventory/";

    Mock::given(method("GET"))
        .and(path(inventory_path))
        .and(query_param("sessionid", "37bf523a24034ec06c60ec61"))
        .and(query_param("partner", "76561198000000001"))
        .and(query_param("appid", "440"))
        .and(query_param("contextid", "2"))
        .and(query_param_is_missing("start"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "more": true,
            "more_start": 1,
            "rgInventory": {
                "11152148507": {"id": "11152148507", "classid": "101785959", "instanceid": "11040578", "amount": "1", "pos": 1},
            },
            "rgDescriptions": {},
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(inventory_path))
        .and(query_param("start", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "more": false,
            "more_start": false,
            "rgInventory": {
                "11152148508": {"id": "11152148508", "classid": "101785959", "instanceid": "0", "amount": "1", "pos": 2},
            },
            "rgDescriptions": {},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let assets = client(&server).api
        .get_partner_inventory(SteamID::from(PARTNER), 440, 2, None)
        .await
        .unwrap();
    let assetids = assets
        .iter()
        .map(|asset| asset.assetid)
        .collect::<Vec<_>>();

    assert_eq!(assetids, vec![11152148507, 11152148508]);
    assert!(assets.iter().all(|asset| asset.appid == 440 && asset.contextid == 2));
    assert_eq!(assets[0].instanceid, Some(11040578));
    assert_eq!(assets[1].instanceid, None);
}

#[tokio::test]
async fn session_operations_need_cookies() {
    let server = MockServer::start().await;
    let client = Client::builder()
        .hostname(server.uri())
        .api_hostname(server.uri())
        .api_key("key".into())
        .build()
        .unwrap();

    assert!(matches!(client.api.accept_offer(1).await, Err(Error::NotLoggedIn)));
    assert!(matches!(client.api.send_offer(&new_offer()).await, Err(Error::NotLoggedIn)));
    assert!(matches!(client.api.get_offer_escrow_duration(1).await, Err(Error::NotLoggedIn)));
    assert!(matches!(client.api.get_receipt(1).await, Err(Error::NotLoggedIn)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
