//! Client ↔ server integration tests
//!
//! Boots the real admin-server app on an ephemeral port with an
//! in-memory database, then exercises the HTTP client and the sync
//! client end to end.

use std::sync::{Arc, Mutex};

use admin_server::core::{Config, ServerState, build_app};
use admin_server::db::DbService;
use saffron_client::{ClientConfig, ClientError, HttpClient, HttpCollectionFetcher, sync};
use shared::models::{FranchiseCreate, Session, SessionCreate, SessionType};

async fn start_server() -> (String, ServerState) {
    let db = DbService::in_memory().await.expect("in-memory db");
    let state = ServerState::with_pool(Config::default(), db.pool);
    let app = build_app(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}"), state)
}

fn client(base_url: &str) -> HttpClient {
    HttpClient::new(&ClientConfig::new(base_url)).expect("client")
}

async fn create_franchise(client: &HttpClient) -> i64 {
    let franchise: shared::models::Franchise = client
        .post(
            "/api/franchises",
            &FranchiseCreate {
                name: "Saffron Koramangala".to_string(),
                code: "SFR-BLR-02".to_string(),
                city: Some("Bengaluru".to_string()),
                timezone: "Asia/Kolkata".to_string(),
            },
        )
        .await
        .expect("create franchise");
    franchise.id
}

fn session_create(franchise_id: i64, name: &str) -> SessionCreate {
    SessionCreate {
        franchise_id,
        name: name.to_string(),
        session_type: SessionType::Dinner,
        date: Some("2026-08-08".to_string()),
        start_time: "19:00".to_string(),
        end_time: Some("22:30".to_string()),
        duration_minutes: None,
        max_capacity: 60,
        special_name: None,
        special_pricing: None,
        special_addons: None,
        special_conditions: None,
        recurrence_type: Default::default(),
    }
}

#[tokio::test]
async fn test_session_lifecycle_over_http() {
    let (base_url, _state) = start_server().await;
    let client = client(&base_url);
    let franchise_id = create_franchise(&client).await;

    let created = client
        .create_session(&session_create(franchise_id, "Weekend Dinner"))
        .await
        .expect("create session");
    assert_eq!(created.name, "Weekend Dinner");
    assert!(created.is_active);

    let sessions = client.sessions().await.expect("list sessions");
    assert_eq!(sessions.len(), 1);

    let deactivated = client
        .deactivate_session(created.id, "Private event")
        .await
        .expect("deactivate");
    assert!(!deactivated.is_active);
    assert_eq!(
        deactivated.deactivation_reason.as_deref(),
        Some("Private event")
    );

    // Envelope error mapping: unknown id surfaces as NotFound
    let missing = client.deactivate_session(999_999, "nope").await;
    assert!(matches!(missing, Err(ClientError::NotFound(_))));
}

#[tokio::test]
async fn test_rpc_round_trips() {
    let (base_url, _state) = start_server().await;
    let client = client(&base_url);

    assert!(client.collection_exists("sessions").await.unwrap());
    assert!(!client.collection_exists("payroll").await.unwrap());

    // Validation failures arrive as typed errors
    let err = client.offer_analytics(&[]).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_sync_client_refetches_on_server_mutation() {
    let (base_url, state) = start_server().await;
    let client = client(&base_url);
    let franchise_id = create_franchise(&client).await;

    let updates: Arc<Mutex<Vec<Vec<Session>>>> = Arc::new(Mutex::new(Vec::new()));
    let updates_in = Arc::clone(&updates);

    let fetcher = HttpCollectionFetcher::new(client.clone(), "/api/sessions");
    let subscription = sync::subscribe(
        state.message_bus.subscribe(),
        "sessions",
        Arc::new(fetcher),
        move |sessions: Vec<Session>| updates_in.lock().unwrap().push(sessions),
        |notification| panic!("unexpected sync error: {}", notification.message),
    );

    // Server-side mutation → change signal → full refetch → callback
    client
        .create_session(&session_create(franchise_id, "Sunday Brunch"))
        .await
        .expect("create session");

    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let seen = updates.lock().unwrap();
    assert_eq!(seen.len(), 1, "exactly one refetch per change signal");
    assert_eq!(seen[0].len(), 1);
    assert_eq!(seen[0][0].name, "Sunday Brunch");
    drop(seen);

    // Idempotent teardown
    subscription.unsubscribe();
    subscription.unsubscribe();
}
