//! End-to-end tests for the client against a local HTTP server.

use agrochar_client::{AgroCharApi, ApiClient, ClearReason, MockFallback, MockTable, SessionEvent};
use agrochar_core::model::{
    AdvisoryRequest, BidRequest, ListingFilters, LoginRequest, NearbyBuyersQuery,
};
use agrochar_core::{
    ClientConfig, ErrorKind, MemorySessionStore, Operation, Session, SessionStore, StorageError,
};
use agrochar_infrastructure::FileSessionStore;
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn config_for(server: &Server) -> ClientConfig {
    ClientConfig::default().with_base_url(format!("{}/api/v1", server.url()))
}

fn client_with(server: &Server, session: Arc<dyn SessionStore>) -> ApiClient {
    ApiClient::from_config(&config_for(server), session)
}

/// A base URL on a port nothing listens on.
fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api/v1")
}

#[tokio::test]
async fn test_unauthenticated_request_has_no_authorization_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/crops")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"name":"rice"}]"#)
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));
    let crops = client.crops().await.unwrap();

    assert_eq!(crops, json!([{"name": "rice"}]));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_stored_token_is_sent_as_bearer() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/farmer/profile")
        .match_header("authorization", "Bearer abc")
        .with_status(200)
        .with_body(r#"{"name":"Rajan Singh"}"#)
        .create_async()
        .await;

    let session = Arc::new(MemorySessionStore::with_session("abc", "farmer"));
    let client = client_with(&server, session);

    let profile = client.farmer_profile().await.unwrap();
    assert_eq!(profile["name"], "Rajan Singh");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_nearby_buyers_sends_query_pairs() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/buyers/nearby")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("district".into(), "Ludhiana".into()),
            Matcher::UrlEncoded("type".into(), "biochar".into()),
            Matcher::UrlEncoded("radius_km".into(), "50".into()),
        ]))
        .with_status(200)
        .with_body(r#"[{"id":1,"name":"Punjab Agro Biochar Co."}]"#)
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));
    let query = NearbyBuyersQuery::new("Ludhiana")
        .with_type("biochar")
        .with_radius_km(50);

    let buyers = client.nearby_buyers(&query).await.unwrap();
    assert_eq!(buyers.as_array().unwrap().len(), 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_listing_filters_skip_absent_values() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/buyers/listings")
        .match_query(Matcher::Exact("status=ready".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));
    let filters = ListingFilters {
        status: Some("ready".into()),
        ..Default::default()
    };

    assert_eq!(client.buyer_listings(&filters).await.unwrap(), json!([]));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_monthly_trends_sends_year() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/admin/analytics/monthly")
        .match_query(Matcher::UrlEncoded("year".into(), "2024".into()))
        .with_status(200)
        .with_body(r#"{"labels":[]}"#)
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));
    client.admin_monthly_trends(Some(2024)).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_advisory_history_appends_farmer_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/advisory/history/f-42")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));
    client.advisory_history("f-42").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_request_bodies_are_json() {
    let mut server = Server::new_async().await;
    let analyze = server
        .mock("POST", "/api/v1/advisory/analyze")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "field_size_acres": 4.0,
            "crop_type": "rice",
            "location_district": "Ludhiana",
            "state": "Punjab"
        })))
        .with_status(200)
        .with_body(r#"{"residue_tonnes":9.6}"#)
        .create_async()
        .await;
    let bid = server
        .mock("POST", "/api/v1/buyers/bid")
        .match_body(Matcher::Json(json!({
            "listing_id": "l-1",
            "price_per_ton": 6200.0,
            "quantity_tons": 2.5
        })))
        .with_status(201)
        .with_body(r#"{"status":"submitted"}"#)
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));

    let result = client
        .analyze_advisory(&AdvisoryRequest::new(4.0, "rice", "Ludhiana"))
        .await
        .unwrap();
    assert_eq!(result["residue_tonnes"], 9.6);

    let placed = client
        .submit_bid(&BidRequest {
            listing_id: "l-1".into(),
            price_per_ton: 6200.0,
            quantity_tons: 2.5,
        })
        .await
        .unwrap();
    assert_eq!(placed["status"], "submitted");

    analyze.assert_async().await;
    bid.assert_async().await;
}

#[tokio::test]
async fn test_login_persists_session_and_announces_it() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::with_path(
        temp_dir.path().join("session.toml"),
    ));

    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login")
        .match_body(Matcher::Json(json!({
            "phone": "9876543210",
            "password": "secret"
        })))
        .with_status(200)
        .with_body(
            r#"{"access_token":"abc","token_type":"bearer","role":"farmer","user_id":"u-1","name":"Rajan"}"#,
        )
        .create_async()
        .await;

    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    let response = client
        .login(&LoginRequest::new("9876543210", "secret"))
        .await
        .unwrap();
    assert_eq!(response.access_token, "abc");

    // A fresh handle on the same file sees the session
    let reopened = FileSessionStore::with_path(store.path());
    assert_eq!(reopened.token().as_deref(), Some("abc"));
    assert_eq!(reopened.role().as_deref(), Some("farmer"));

    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Established {
            role: "farmer".into()
        }
    );
}

/// A store whose disk is always full.
struct ReadOnlyStore;

impl SessionStore for ReadOnlyStore {
    fn load(&self) -> Session {
        Session::default()
    }

    fn set_session(&self, _token: &str, _role: &str) -> Result<(), StorageError> {
        Err(StorageError::io("disk full"))
    }

    fn clear(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[tokio::test]
async fn test_login_fails_when_session_cannot_be_stored() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login")
        .with_status(200)
        .with_body(r#"{"access_token":"abc","role":"farmer"}"#)
        .create_async()
        .await;

    let store = Arc::new(ReadOnlyStore);
    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    let err = client
        .login(&LoginRequest::new("9876543210", "secret"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Storage);
    assert!(err.message.contains("disk full"));
    assert_eq!(store.token(), None);
    // Nothing was established, so nobody is told otherwise
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_login_failure_leaves_session_untouched() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login")
        .with_status(400)
        .with_body(r#"{"detail":"Invalid phone or password"}"#)
        .create_async()
        .await;

    let session = Arc::new(MemorySessionStore::new());
    let client = client_with(&server, session.clone());

    let err = client
        .login(&LoginRequest::new("9876543210", "wrong"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Http);
    assert_eq!(err.message, "Invalid phone or password");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_unauthorized_clears_persisted_session() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FileSessionStore::with_path(
        temp_dir.path().join("session.toml"),
    ));
    store.set_session("expired", "buyer").unwrap();

    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/buyers/orders")
        .with_status(401)
        .with_body(r#"{"detail":"Token expired"}"#)
        .create_async()
        .await;

    let client = client_with(&server, store.clone());
    let mut events = client.subscribe();

    let err = client.buyer_orders(None).await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "Token expired");

    assert!(!store.is_authenticated());
    assert!(!store.path().exists());
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Cleared {
            reason: ClearReason::Unauthorized
        }
    );
}

#[tokio::test]
async fn test_logout_clears_even_when_backend_fails() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1/auth/logout")
        .with_status(500)
        .with_body(r#"{"detail":"boom"}"#)
        .create_async()
        .await;

    let session = Arc::new(MemorySessionStore::with_session("abc", "admin"));
    let client = client_with(&server, session.clone());
    let mut events = client.subscribe();

    client.logout().await;

    assert!(!session.is_authenticated());
    assert_eq!(
        events.try_recv().unwrap(),
        SessionEvent::Cleared {
            reason: ClearReason::Logout
        }
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_logout_clears_when_backend_unreachable() {
    let config = ClientConfig::default().with_base_url(unreachable_base_url());
    let session = Arc::new(MemorySessionStore::with_session("abc", "farmer"));
    let client = ApiClient::from_config(&config, session.clone());

    client.logout().await;
    assert_eq!(session.token(), None);
}

#[tokio::test]
async fn test_validation_detail_is_rendered_as_json() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/farmer/fields")
        .with_status(422)
        .with_body(r#"{"detail":[{"loc":["body","size_acres"],"msg":"field required"}]}"#)
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));
    let err = client
        .add_farmer_field(&agrochar_core::model::FieldRequest {
            size_acres: 0.0,
            crop_type: "rice".into(),
            location_district: "Patiala".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Http);
    assert_eq!(err.status, Some(422));
    assert!(err.message.contains("field required"));
    assert!(err.body.is_some());
}

#[tokio::test]
async fn test_error_without_detail_uses_generic_message() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/admin/analytics/co2")
        .with_status(503)
        .with_body("{}")
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));
    let err = client.admin_co2_stats().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Http);
    assert_eq!(err.status, Some(503));
    assert_eq!(err.message, "Request failed");
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/buyers/alerts")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));
    let err = client.buyer_alerts().await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Decode);
    assert_eq!(err.status, Some(502));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let config = ClientConfig::default().with_base_url(unreachable_base_url());
    let client = ApiClient::from_config(&config, Arc::new(MemorySessionStore::new()));

    let err = client.crops().await.unwrap_err();
    assert!(err.is_network());
    assert_eq!(err.status, None);
}

#[tokio::test]
async fn test_silent_backend_times_out() {
    // Accepted by the kernel, never answered
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let config = ClientConfig::default()
        .with_base_url(format!("http://127.0.0.1:{port}/api/v1"))
        .with_timeout_ms(150);
    let client = ApiClient::from_config(&config, Arc::new(MemorySessionStore::new()));

    let started = std::time::Instant::now();
    let err = client.admin_overview().await.unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(err.status, Some(408));
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
    drop(listener);
}

#[tokio::test]
async fn test_mock_fallback_substitutes_when_backend_down() {
    let config = ClientConfig::default()
        .with_base_url(unreachable_base_url())
        .with_mock(true);
    let client = ApiClient::from_config(&config, Arc::new(MemorySessionStore::new()));
    let api = MockFallback::from_config(client, &config);

    let overview = api.admin_overview().await.unwrap();
    assert_eq!(
        overview,
        *MockTable::builtin().get(Operation::AdminOverview).unwrap()
    );

    // No canned payload registered for crops
    assert_eq!(api.crops().await.unwrap(), json!({}));
}

#[tokio::test]
async fn test_mock_fallback_disabled_propagates() {
    let config = ClientConfig::default().with_base_url(unreachable_base_url());
    let client = ApiClient::from_config(&config, Arc::new(MemorySessionStore::new()));
    let api = MockFallback::from_config(client, &config);

    assert!(api.admin_overview().await.unwrap_err().is_network());
}

#[tokio::test]
async fn test_mock_fallback_keeps_real_results() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/admin/analytics/overview")
        .with_status(200)
        .with_body(r#"{"farmers_onboarded":1}"#)
        .create_async()
        .await;

    let config = config_for(&server).with_mock(true);
    let client = ApiClient::from_config(&config, Arc::new(MemorySessionStore::new()));
    let api = MockFallback::from_config(client, &config);

    assert_eq!(
        api.admin_overview().await.unwrap(),
        json!({"farmers_onboarded": 1})
    );
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/crops")
        .with_status(200)
        .with_body(r#"["rice","wheat"]"#)
        .expect(5)
        .create_async()
        .await;
    server
        .mock("GET", "/api/v1/buyers/alerts")
        .with_status(500)
        .with_body(r#"{"detail":"alerts offline"}"#)
        .create_async()
        .await;

    let client = client_with(&server, Arc::new(MemorySessionStore::new()));

    let crops = futures::future::join_all((0..5).map(|_| client.crops())).await;
    let alerts = client.buyer_alerts().await;

    assert!(crops.iter().all(|r| r.as_ref().unwrap() == &json!(["rice", "wheat"])));
    assert_eq!(alerts.unwrap_err().message, "alerts offline");
}
