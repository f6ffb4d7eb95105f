//! Signed transport against a scripted local exchange.

use coinferry::adapter::outbound::bitget::signing::{local_now_ms, sign, Method, Params};
use coinferry::error::ExchangeError;
use coinferry::testkit::client::{self, API_KEY, PASSPHRASE, SECRET_KEY};
use coinferry::testkit::exchange::{
    RecordedRequest, ScriptedExchange, ScriptedResponse, TIME_PATH,
};
use serde_json::json;

const ASSETS_PATH: &str = "/api/v2/spot/account/assets";
const TRANSFER_PATH: &str = "/api/v2/spot/wallet/transfer";

fn assert_signed(request: &RecordedRequest, method: Method) {
    let timestamp = request.header("ACCESS-TIMESTAMP").expect("timestamp header");
    let expected = sign(SECRET_KEY, timestamp, method, &request.target(), &request.body);
    assert_eq!(request.header("ACCESS-SIGN"), Some(expected.as_str()));
    assert_eq!(request.header("ACCESS-KEY"), Some(API_KEY));
    assert_eq!(request.header("ACCESS-PASSPHRASE"), Some(PASSPHRASE));
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(request.header("locale"), Some("en-US"));
}

#[tokio::test]
async fn get_request_is_signed_over_path_and_query() {
    let exchange = ScriptedExchange::start().await;
    exchange.with_server_time(local_now_ms());
    exchange.on_ok(ASSETS_PATH, json!([{"coin": "ETH", "available": "1.5"}]));

    let client = client::client(&exchange.url());
    let balances = client.asset.balances(Some("ETH")).await.expect("balances");
    assert_eq!(balances["ETH"].available.to_string(), "1.5");

    let requests = exchange.requests_to(ASSETS_PATH);
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "GET");
    assert_eq!(request.query, "coin=ETH");
    assert!(request.body.is_empty());
    assert_signed(request, Method::Get);
}

#[tokio::test]
async fn post_request_is_signed_over_compact_json_body() {
    let exchange = ScriptedExchange::start().await;
    exchange.with_server_time(local_now_ms());
    exchange.on_ok(TRANSFER_PATH, json!({"transferId": "77", "clientOid": "c-1"}));

    let client = client::client(&exchange.url());
    let params = Params::new()
        .with("coin", "USDT")
        .with("amount", "10")
        .with_opt("clientOid", None::<&str>);
    client
        .transport()
        .post(TRANSFER_PATH, &params)
        .await
        .expect("transfer");

    let request = &exchange.requests_to(TRANSFER_PATH)[0];
    assert_eq!(request.method, "POST");
    assert_eq!(request.json_body(), Some(json!({"coin": "USDT", "amount": "10"})));
    assert!(!request.body.contains("clientOid"));
    assert!(!request.body.contains(' '));
    assert_signed(request, Method::Post);
}

#[tokio::test]
async fn timestamp_follows_the_exchange_clock() {
    let exchange = ScriptedExchange::start().await;
    let skew_ms = 60_000;
    exchange.with_server_time(local_now_ms() + skew_ms);
    exchange.on_ok(ASSETS_PATH, json!([]));

    let client = client::client(&exchange.url());
    client.asset.balances(None).await.expect("balances");

    let request = &exchange.requests_to(ASSETS_PATH)[0];
    let sent: i64 = request
        .header("ACCESS-TIMESTAMP")
        .and_then(|ts| ts.parse().ok())
        .expect("numeric timestamp");
    let expected = local_now_ms() + skew_ms;
    assert!((sent - expected).abs() < 5_000, "sent {sent}, expected about {expected}");
    assert!(client.transport().clock().is_synced());
}

#[tokio::test]
async fn clock_is_synced_once_per_client() {
    let exchange = ScriptedExchange::start().await;
    exchange.with_server_time(local_now_ms());
    exchange.on_ok(ASSETS_PATH, json!([]));

    let client = client::client(&exchange.url());
    client.asset.balances(None).await.expect("first");
    client.asset.balances(None).await.expect("second");

    assert_eq!(exchange.hits(TIME_PATH), 1);
    assert_eq!(exchange.hits(ASSETS_PATH), 2);
}

#[tokio::test]
async fn stale_timestamp_resyncs_and_retries_once() {
    let exchange = ScriptedExchange::start().await;
    exchange.with_server_time(local_now_ms());
    exchange
        .on(ASSETS_PATH, ScriptedResponse::error("40008", "Request timestamp expired"))
        .on_ok(ASSETS_PATH, json!([{"coin": "ETH", "available": "2"}]));

    let client = client::client(&exchange.url());
    let balances = client.asset.balances(Some("ETH")).await.expect("retried");
    assert_eq!(balances["ETH"].available.to_string(), "2");

    assert_eq!(exchange.hits(TIME_PATH), 2);
    let requests = exchange.requests_to(ASSETS_PATH);
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_signed(request, Method::Get);
    }
    assert_eq!(requests[0].target(), requests[1].target());
}

#[tokio::test]
async fn second_stale_timestamp_is_returned_to_the_caller() {
    let exchange = ScriptedExchange::start().await;
    exchange.with_server_time(local_now_ms());
    exchange.on(ASSETS_PATH, ScriptedResponse::error("40008", "Request timestamp expired"));

    let client = client::client(&exchange.url());
    let err = client.asset.balances(None).await.expect_err("stale twice");
    assert!(err.is_stale_timestamp());
    assert_eq!(exchange.hits(ASSETS_PATH), 2);
    assert_eq!(exchange.hits(TIME_PATH), 2);
}

#[tokio::test]
async fn other_api_errors_are_not_retried() {
    let exchange = ScriptedExchange::start().await;
    exchange.with_server_time(local_now_ms());
    exchange.on(ASSETS_PATH, ScriptedResponse::error("40014", "Incorrect permissions"));

    let client = client::client(&exchange.url());
    let err = client.asset.balances(None).await.expect_err("api error");
    assert_eq!(
        err,
        ExchangeError::Api {
            code: "40014".into(),
            message: "Incorrect permissions".into(),
        }
    );
    assert_eq!(exchange.hits(ASSETS_PATH), 1);
}

#[tokio::test]
async fn failed_clock_sync_does_not_block_the_request() {
    let exchange = ScriptedExchange::start().await;
    exchange.on(TIME_PATH, ScriptedResponse::raw(502, "<html>bad gateway</html>"));
    exchange.on_ok(ASSETS_PATH, json!([]));

    let client = client::client(&exchange.url());
    client.asset.balances(None).await.expect("request still sent");

    assert!(!client.transport().clock().is_synced());
    assert_eq!(exchange.hits(ASSETS_PATH), 1);
}

#[tokio::test]
async fn non_json_error_page_is_a_transport_error_with_status() {
    let exchange = ScriptedExchange::start().await;
    exchange.with_server_time(local_now_ms());
    exchange.on(ASSETS_PATH, ScriptedResponse::raw(502, "<html>bad gateway</html>"));

    let client = client::client(&exchange.url());
    let err = client.asset.balances(None).await.expect_err("transport error");
    assert!(
        matches!(err, ExchangeError::Transport { status: Some(502), .. }),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn unreachable_exchange_is_a_transport_error() {
    let client = client::client(&client::dead_url());
    let err = client.asset.balances(None).await.expect_err("nothing listening");
    assert!(matches!(err, ExchangeError::Transport { .. }), "unexpected error: {err:?}");
}
