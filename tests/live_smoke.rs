use std::sync::Arc;

use coinbase_api_client::auth::EnvCredentials;
use coinbase_api_client::rest::CoinbaseRestClient;
use coinbase_api_client::{AccountSession, SessionState};

fn live_tests_enabled() -> bool {
    std::env::var("COINBASE_LIVE_TESTS").ok().as_deref() == Some("1")
}

fn live_client() -> Option<CoinbaseRestClient> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return None;
    }

    let credentials = EnvCredentials::try_from_env()?;
    CoinbaseRestClient::builder()
        .credentials(Arc::new(credentials))
        .build()
        .ok()
}

#[tokio::test]
#[ignore]
async fn live_exchange_rate_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let Some(client) = live_client() else {
        return Ok(());
    };

    let rate = client.get_exchange_rate("BTC", "EUR").await?;
    assert!(rate > 0.0);

    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_account_session_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let Some(client) = live_client() else {
        return Ok(());
    };

    let accounts = client.list_accounts().await?;
    assert!(!accounts.is_empty());

    let session = AccountSession::new(client);
    session.initialize().await?;
    assert_eq!(session.state(), SessionState::Ready);

    Ok(())
}
