use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use coinbase_api_client::auth::{AuthConfig, refresh_callback};
use coinbase_api_client::error::CoinbaseError;
use coinbase_api_client::rest::CoinbaseRestClient;

/// Show library logs when run with `RUST_LOG=coinbase_api_client=debug`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn user_body() -> serde_json::Value {
    serde_json::json!({
        "data": {
            "id": "user-1",
            "name": "Satoshi",
            "native_currency": "USD"
        }
    })
}

fn unauthorized() -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(serde_json::json!({
        "errors": [{"id": "expired_token", "message": "The access token expired"}]
    }))
}

fn refreshed() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "access_token": "access-2",
        "token_type": "bearer",
        "expires_in": 7200,
        "refresh_token": "refresh-2",
        "scope": "wallet:user:read"
    }))
}

fn refresh_grant() -> serde_json::Value {
    serde_json::json!({
        "grant_type": "refresh_token",
        "refresh_token": "refresh-1",
        "client_id": "client-id",
        "client_secret": "client-secret"
    })
}

fn oauth_auth() -> AuthConfig {
    AuthConfig::oauth("client-id", "client-secret", "access-1", "refresh-1")
}

#[tokio::test]
async fn test_valid_token_is_sent_as_bearer() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(refreshed())
        .expect(0)
        .mount(&server)
        .await;

    let client = CoinbaseRestClient::builder()
        .base_url(server.uri())
        .auth(oauth_auth())
        .build();
    let user = client.get_current_user().await.unwrap();
    assert_eq!(user.id, "user-1");
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once_and_retried() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_json(refresh_grant()))
        .respond_with(refreshed())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let client = CoinbaseRestClient::builder()
        .base_url(server.uri())
        .auth(oauth_auth())
        .on_token_refresh(refresh_callback(move |tokens| {
            let sink = sink.clone();
            async move {
                sink.lock()
                    .unwrap()
                    .push((tokens.access_token, tokens.refresh_token, tokens.expires_in));
            }
        }))
        .build();

    let user = client.get_current_user().await.unwrap();
    assert_eq!(user.name.as_deref(), Some("Satoshi"));

    assert_eq!(
        *seen.lock().unwrap(),
        vec![("access-2".to_string(), "refresh-2".to_string(), Some(7200))]
    );
    let tokens = client.oauth_tokens().await.unwrap();
    assert_eq!(tokens.expose_access_token(), "access-2");
    assert_eq!(tokens.expose_refresh_token(), "refresh-2");
    assert_eq!(tokens.client_id, "client-id");
}

#[tokio::test]
async fn test_second_unauthorized_is_not_refreshed_again() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .respond_with(unauthorized())
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(refreshed())
        .expect(1)
        .mount(&server)
        .await;

    let client = CoinbaseRestClient::builder()
        .base_url(server.uri())
        .auth(oauth_auth())
        .build();
    let err = client.get_current_user().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    match err {
        CoinbaseError::Transport(transport) => {
            assert_eq!(transport.messages(), vec!["The access token expired"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_other_errors_do_not_refresh() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "errors": [{"id": "invalid_scope", "message": "Missing wallet:user:read"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(refreshed())
        .expect(0)
        .mount(&server)
        .await;

    let client = CoinbaseRestClient::builder()
        .base_url(server.uri())
        .auth(oauth_auth())
        .build();
    let err = client.get_current_user().await.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(client.oauth_tokens().await.unwrap().expose_access_token(), "access-1");
}

#[tokio::test]
async fn test_failed_refresh_propagates_without_retry() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "errors": [{"id": "invalid_grant", "message": "Refresh token revoked"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let called = Arc::new(Mutex::new(false));
    let flag = called.clone();
    let client = CoinbaseRestClient::builder()
        .base_url(server.uri())
        .auth(oauth_auth())
        .on_token_refresh(refresh_callback(move |_| {
            let flag = flag.clone();
            async move {
                *flag.lock().unwrap() = true;
            }
        }))
        .build();

    let err = client.get_current_user().await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(!*called.lock().unwrap());
    assert_eq!(client.oauth_tokens().await.unwrap().expose_refresh_token(), "refresh-1");
}

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_refresh() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(unauthorized().set_delay(Duration::from_millis(200)))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_json(refresh_grant()))
        .respond_with(refreshed())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = CoinbaseRestClient::builder()
        .base_url(server.uri())
        .auth(oauth_auth())
        .build();
    let other = client.clone();

    let (first, second) = tokio::join!(client.get_current_user(), other.get_current_user());
    assert_eq!(first.unwrap().id, "user-1");
    assert_eq!(second.unwrap().id, "user-1");
}

#[tokio::test]
async fn test_refresh_callback_may_use_the_client() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(unauthorized())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(refreshed())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(2)
        .mount(&server)
        .await;

    let shared: Arc<OnceLock<CoinbaseRestClient>> = Arc::new(OnceLock::new());
    let saved = Arc::new(Mutex::new(None));
    let (handle, sink) = (shared.clone(), saved.clone());
    let client = CoinbaseRestClient::builder()
        .base_url(server.uri())
        .auth(oauth_auth())
        .on_token_refresh(refresh_callback(move |_| {
            let client = handle.get().cloned();
            let sink = sink.clone();
            async move {
                let Some(client) = client else { return };
                let tokens = client.oauth_tokens().await.unwrap();
                let user = client.get_current_user().await.unwrap();
                *sink.lock().unwrap() =
                    Some((tokens.expose_refresh_token().to_string(), user.id));
            }
        }))
        .build();
    let _ = shared.set(client.clone());

    let user = tokio::time::timeout(Duration::from_secs(5), client.get_current_user())
        .await
        .expect("request finished")
        .unwrap();
    assert_eq!(user.id, "user-1");
    assert_eq!(
        *saved.lock().unwrap(),
        Some(("refresh-2".to_string(), "user-1".to_string()))
    );
}

#[tokio::test]
async fn test_concurrent_unauthorized_requests_share_one_failed_refresh() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .respond_with(unauthorized().set_delay(Duration::from_millis(200)))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "errors": [{"id": "invalid_grant", "message": "Refresh token revoked"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CoinbaseRestClient::builder()
        .base_url(server.uri())
        .auth(oauth_auth())
        .build();

    let (a, b, c) = tokio::join!(
        client.get_current_user(),
        client.get_current_user(),
        client.get_current_user()
    );
    for result in [a, b, c] {
        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(400));
        match err {
            CoinbaseError::Transport(transport) => {
                assert_eq!(transport.messages(), vec!["Refresh token revoked"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_later_request_retries_after_failed_refresh() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(unauthorized())
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(body_json(refresh_grant()))
        .respond_with(refreshed())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/user"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = CoinbaseRestClient::builder()
        .base_url(server.uri())
        .auth(oauth_auth())
        .build();

    let err = client.get_current_user().await.unwrap_err();
    assert_eq!(err.status(), Some(503));

    let user = client.get_current_user().await.unwrap();
    assert_eq!(user.id, "user-1");
}
