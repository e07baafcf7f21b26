//! Sessions API integration tests
//!
//! Drives the real router over an in-memory SQLite database with
//! tower's `oneshot`, asserting the envelope contract and the sync
//! broadcasts mutation handlers emit.

use admin_server::core::{Config, ServerState, build_app};
use admin_server::db::DbService;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::message::{EventType, SyncPayload};
use tower::ServiceExt;

async fn test_state() -> ServerState {
    let db = DbService::in_memory().await.expect("in-memory db");
    ServerState::with_pool(Config::default(), db.pool)
}

async fn test_app() -> (Router, ServerState) {
    let state = test_state().await;
    (build_app(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn post_json(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

async fn create_franchise(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        post_json(
            "/api/franchises",
            json!({"name": "Saffron Indiranagar", "code": "SFR-BLR-01", "city": "Bengaluru"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().expect("franchise id")
}

fn session_payload(franchise_id: i64) -> Value {
    json!({
        "franchiseId": franchise_id,
        "name": "Weekend Dinner",
        "sessionType": "dinner",
        "date": "2026-08-08",
        "startTime": "19:00",
        "endTime": "22:30",
        "maxCapacity": 80
    })
}

#[tokio::test]
async fn test_create_requires_fields_before_db_write() {
    let (app, _state) = test_app().await;
    let franchise_id = create_franchise(&app).await;

    // Empty name
    let mut missing_name = session_payload(franchise_id);
    missing_name["name"] = json!("   ");
    let (status, body) = send(&app, post_json("/api/sessions", missing_name)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("E0002"));

    // Non-recurring without a date
    let mut no_date = session_payload(franchise_id);
    no_date.as_object_mut().unwrap().remove("date");
    let (status, body) = send(&app, post_json("/api/sessions", no_date)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("E0002"));

    // Malformed start time
    let mut bad_time = session_payload(franchise_id);
    bad_time["startTime"] = json!("7pm");
    let (status, _) = send(&app, post_json("/api/sessions", bad_time)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was persisted
    let (_, body) = send(&app, get("/api/sessions")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_list_update_round_trip() {
    let (app, _state) = test_app().await;
    let franchise_id = create_franchise(&app).await;

    let (status, body) = send(&app, post_json("/api/sessions", session_payload(franchise_id))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["bookedCount"], json!(0));
    assert_eq!(body["data"]["isActive"], json!(true));
    let id = body["data"]["id"].as_i64().unwrap();

    // Listed with camelCase fields
    let (status, body) = send(&app, get("/api/sessions")).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = body["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["sessionType"], json!("dinner"));
    assert_eq!(sessions[0]["maxCapacity"], json!(80));

    // Update merges; untouched fields survive
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/api/sessions/{id}"))
        .header("content-type", "application/json")
        .body(Body::from(json!({"maxCapacity": 100}).to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["maxCapacity"], json!(100));
    assert_eq!(body["data"]["name"], json!("Weekend Dinner"));

    // Unknown id is a 404 envelope
    let (status, body) = send(&app, get("/api/sessions/99999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("E0003"));
}

#[tokio::test]
async fn test_booked_count_adjustment_allows_overbooking() {
    let (app, _state) = test_app().await;
    let franchise_id = create_franchise(&app).await;
    let (_, body) = send(&app, post_json("/api/sessions", session_payload(franchise_id))).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let adjust = |delta: i64| {
        Request::builder()
            .method("POST")
            .uri(format!("/api/sessions/{id}/booked-count"))
            .header("content-type", "application/json")
            .body(Body::from(json!({"delta": delta}).to_string()))
            .unwrap()
    };

    let (status, body) = send(&app, adjust(6)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["bookedCount"], json!(6));

    // No ceiling at maxCapacity: overbooking is accepted as-is
    let (_, body) = send(&app, adjust(100)).await;
    assert_eq!(body["data"]["bookedCount"], json!(106));
    assert_eq!(body["data"]["maxCapacity"], json!(80));

    // Floor at zero on cancellation storms
    let (_, body) = send(&app, adjust(-500)).await;
    assert_eq!(body["data"]["bookedCount"], json!(0));
}

#[tokio::test]
async fn test_deactivate_requires_reason_and_is_soft() {
    let (app, _state) = test_app().await;
    let franchise_id = create_franchise(&app).await;
    let (_, body) = send(&app, post_json("/api/sessions", session_payload(franchise_id))).await;
    let id = body["data"]["id"].as_i64().unwrap();

    // Empty reason rejected
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/sessions/{id}/deactivate"))
        .header("content-type", "application/json")
        .body(Body::from(json!({"reason": ""}).to_string()))
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Deactivation stores the reason, never deletes
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/sessions/{id}/deactivate"))
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"reason": "Kitchen renovation"}).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isActive"], json!(false));
    assert_eq!(body["data"]["deactivationReason"], json!("Kitchen renovation"));

    // Still fetchable by id
    let (status, _) = send(&app, get(&format!("/api/sessions/{id}"))).await;
    assert_eq!(status, StatusCode::OK);

    // Second deactivate conflicts
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/sessions/{id}/deactivate"))
        .header("content-type", "application/json")
        .body(Body::from(json!({"reason": "again"}).to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], json!("E0004"));
}

#[tokio::test]
async fn test_unsupported_method_yields_405_envelope() {
    let (app, _state) = test_app().await;
    let request = Request::builder()
        .method("DELETE")
        .uri("/api/sessions/1")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("E0006"));
}

#[tokio::test]
async fn test_mutations_broadcast_sync_with_incrementing_versions() {
    let (app, state) = test_app().await;
    let mut rx = state.message_bus.subscribe();

    let franchise_id = create_franchise(&app).await;
    let msg = rx.recv().await.unwrap();
    assert_eq!(msg.event_type, EventType::Sync);
    let payload: SyncPayload = msg.decode_payload().unwrap();
    assert_eq!(payload.resource, "franchises");
    assert_eq!(payload.action, "created");
    assert_eq!(payload.version, 1);

    let (_, body) = send(&app, post_json("/api/sessions", session_payload(franchise_id))).await;
    let id = body["data"]["id"].as_i64().unwrap();
    let payload: SyncPayload = rx.recv().await.unwrap().decode_payload().unwrap();
    assert_eq!(payload.resource, "sessions");
    assert_eq!(payload.version, 1);
    assert_eq!(payload.id, id.to_string());
    assert!(payload.data.is_some());

    // Filters by list endpoint reflect the change feed's collection
    let (_, body) = send(&app, get("/api/sync/status")).await;
    assert_eq!(body["data"]["versions"]["sessions"], json!(1));
    assert_eq!(body["data"]["versions"]["franchises"], json!(1));
}

#[tokio::test]
async fn test_list_filters_and_date_bounds() {
    let (app, _state) = test_app().await;
    let franchise_id = create_franchise(&app).await;

    for (name, session_type, date) in [
        ("Early Lunch", "lunch", "2026-08-01"),
        ("Dinner A", "dinner", "2026-08-05"),
        ("Dinner B", "dinner", "2026-08-20"),
    ] {
        let mut payload = session_payload(franchise_id);
        payload["name"] = json!(name);
        payload["sessionType"] = json!(session_type);
        payload["date"] = json!(date);
        let (status, _) = send(&app, post_json("/api/sessions", payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // "all" sentinel leaves the type unrestricted
    let (_, body) = send(&app, get("/api/sessions?sessionType=all")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, body) = send(&app, get("/api/sessions?sessionType=dinner")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Inclusive date bounds
    let (_, body) = send(
        &app,
        get("/api/sessions?startDate=2026-08-01&endDate=2026-08-05"),
    )
    .await;
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"Early Lunch".to_string()));

    // Malformed bound rejected up front
    let (status, _) = send(&app, get("/api/sessions?startDate=garbage")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Free-text search over name
    let (_, body) = send(&app, get("/api/sessions?search=dinner")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
