use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coinbase_api_client::auth::StaticCredentials;
use coinbase_api_client::rest::CoinbaseRestClient;
use coinbase_api_client::{AccountSession, CoinbaseError, SessionState, SupportedCurrency};

fn build_client(server: &MockServer) -> CoinbaseRestClient {
    build_client_with_retries(server, 0)
}

fn build_client_with_retries(server: &MockServer, max_retries: u32) -> CoinbaseRestClient {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let credentials = Arc::new(StaticCredentials::new("test_key", "test_secret").unwrap());
    CoinbaseRestClient::builder()
        .base_url(server.uri())
        .credentials(credentials)
        .max_retries(max_retries)
        .build()
        .unwrap()
}

fn accounts_body(currencies: &[&str]) -> serde_json::Value {
    let data: Vec<serde_json::Value> = currencies
        .iter()
        .map(|currency| {
            let id = format!("{}-wallet", currency.to_ascii_lowercase());
            serde_json::json!({
                "id": id,
                "name": format!("{currency} Wallet"),
                "primary": false,
                "type": "wallet",
                "currency": { "code": currency },
                "balance": { "amount": "0.00000000", "currency": currency },
                "resource": "account",
                "resource_path": format!("/v2/accounts/{id}")
            })
        })
        .collect();
    serde_json::json!({ "pagination": { "next_uri": null }, "data": data })
}

async fn mount_accounts(server: &MockServer, currencies: &[&str], delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/v2/accounts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(accounts_body(currencies))
                .set_delay(delay),
        )
        .expect(1)
        .mount(server)
        .await;
}

fn address_response(id: &str, address: &str) -> serde_json::Value {
    serde_json::json!({
        "data": { "id": id, "address": address, "name": null, "resource": "address" }
    })
}

#[tokio::test]
async fn test_session_becomes_ready_and_creates_address() {
    let server = MockServer::start().await;
    mount_accounts(&server, &["EUR", "BTC", "ETH", "LTC"], Duration::ZERO).await;

    Mock::given(method("POST"))
        .and(path("/v2/accounts/ltc-wallet/addresses"))
        .and(body_json(serde_json::json!({ "name": "order 7" })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(address_response("addr-ltc", "LZ3ht6kXo5VGswvyDMxNXrmnU2a6w7HUXv")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = AccountSession::new(build_client(&server));
    assert_eq!(session.state(), SessionState::Uninitialized);

    session.initialize().await.unwrap();
    assert!(session.is_ready());
    assert_eq!(session.wallet(SupportedCurrency::Btc).unwrap().id, "btc-wallet");

    let address = session.create_address("ltc", Some("order 7")).await.unwrap();
    assert_eq!(address.address, "LZ3ht6kXo5VGswvyDMxNXrmnU2a6w7HUXv");
}

#[tokio::test]
async fn test_session_fails_when_wallet_missing() {
    let server = MockServer::start().await;
    mount_accounts(&server, &["BTC", "ETH"], Duration::ZERO).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let session = AccountSession::new(build_client(&server));
    let result = session.initialize().await;

    match result {
        Err(CoinbaseError::SessionFailed(reason)) => assert!(reason.contains("LTC")),
        other => panic!("expected session failure, got {other:?}"),
    }
    assert!(matches!(session.state(), SessionState::Failed(_)));

    let result = session
        .create_withdrawal("BTC", "1Btc", Decimal::ONE, None)
        .await;
    assert!(matches!(
        result,
        Err(CoinbaseError::NotReady(SessionState::Failed(_)))
    ));

    let again = session.initialize().await;
    assert!(matches!(again, Err(CoinbaseError::AlreadyInitialized(_))));
}

#[tokio::test]
async fn test_session_fails_when_listing_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/accounts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "errors": [{ "id": "authentication_error", "message": "invalid signature" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = AccountSession::new(build_client(&server));
    let result = session.initialize().await;

    match result {
        Err(CoinbaseError::Api(error)) => assert!(error.is_authentication_error()),
        other => panic!("expected API error, got {other:?}"),
    }
    assert!(matches!(session.wait_until_settled().await, SessionState::Failed(_)));
}

#[tokio::test]
async fn test_operations_rejected_while_loading() {
    let server = MockServer::start().await;
    mount_accounts(&server, &["BTC", "ETH", "LTC"], Duration::from_millis(300)).await;

    Mock::given(method("POST"))
        .and(path("/v2/accounts/btc-wallet/addresses"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(address_response("addr-btc", "mswUGcPHp1YnkLCgF1TtoryqSc5E9Q8xFa")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = AccountSession::start(build_client(&server));

    let early = session.create_address("BTC", None).await;
    assert!(matches!(early, Err(CoinbaseError::NotReady(_))));

    assert_eq!(session.wait_until_settled().await, SessionState::Ready);
    let address = session.create_address("BTC", None).await.unwrap();
    assert_eq!(address.id, "addr-btc");
}

#[tokio::test]
async fn test_unsupported_currency_makes_no_request() {
    let server = MockServer::start().await;
    mount_accounts(&server, &["BTC", "ETH", "LTC"], Duration::ZERO).await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let session = AccountSession::new(build_client(&server));
    session.initialize().await.unwrap();

    let withdrawal = session
        .create_withdrawal("DOGE", "DAddr", Decimal::ONE, None)
        .await;
    assert!(matches!(withdrawal, Err(CoinbaseError::Validation(_))));

    let address = session.create_address("XRP", None).await;
    assert!(matches!(address, Err(CoinbaseError::Validation(_))));

    server.verify().await;
}

#[tokio::test]
async fn test_exchange_rate_available_before_ready() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/exchange-rates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "currency": "ETH", "rates": { "USD": "2500.5" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = AccountSession::new(build_client(&server));
    let rate = session.exchange_rate("ETH", "usd").await.unwrap();

    assert_eq!(rate, 2500.5);
    assert_eq!(session.state(), SessionState::Uninitialized);
}

#[tokio::test]
async fn test_withdrawal_is_not_retried_on_server_error() {
    let server = MockServer::start().await;
    mount_accounts(&server, &["BTC", "ETH", "LTC"], Duration::ZERO).await;

    Mock::given(method("POST"))
        .and(path("/v2/accounts/btc-wallet/transactions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v2/accounts/btc-wallet/transactions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": {
                "id": "tx-1",
                "type": "send",
                "status": "pending",
                "amount": { "amount": "-1", "currency": "BTC" }
            }
        })))
        .expect(0)
        .mount(&server)
        .await;

    let session = AccountSession::new(build_client_with_retries(&server, 3));
    session.initialize().await.unwrap();

    let result = session
        .create_withdrawal("BTC", "addr", Decimal::ONE, None)
        .await;

    match result {
        Err(CoinbaseError::Api(error)) => assert_eq!(error.status, 503),
        other => panic!("expected API error, got {other:?}"),
    }

    let requests = server.received_requests().await.unwrap();
    let sends = requests
        .iter()
        .filter(|r| r.method.as_str() == "POST")
        .count();
    assert_eq!(sends, 1);
    server.verify().await;
}
