use coinbase_api_client::auth::AuthConfig;
use coinbase_api_client::rest::CoinbaseRestClient;
use coinbase_api_client::types::ListParams;

fn live_tests_enabled() -> bool {
    std::env::var("COINBASE_LIVE_TESTS").ok().as_deref() == Some("1")
}

#[tokio::test]
#[ignore]
async fn live_public_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let client = CoinbaseRestClient::new();
    let time = client.get_server_time().await?;
    assert!(time.epoch > 0);

    let price = client.get_spot_price("BTC-USD").await?;
    assert_eq!(price.currency, "USD");

    Ok(())
}

#[tokio::test]
#[ignore]
async fn live_private_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }

    let auth = match AuthConfig::try_from_env() {
        Some(auth) => auth,
        None => return Ok(()),
    };
    let client = CoinbaseRestClient::builder().auth(auth).build();

    let _user = client.get_current_user().await?;
    let accounts = client.list_accounts(Some(&ListParams::with_limit(1))).await?;
    if accounts.has_next() {
        let next = accounts.fetch_next().await?;
        assert!(next.is_some());
    }

    Ok(())
}
