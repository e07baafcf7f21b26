//! Backend RPC integration tests

use admin_server::core::{Config, ServerState, build_app};
use admin_server::db::DbService;
use admin_server::db::repository::offer;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{DiscountType, OfferCreate, OfferEventType};
use tower::ServiceExt;

async fn test_app() -> (Router, ServerState) {
    let db = DbService::in_memory().await.expect("in-memory db");
    let state = ServerState::with_pool(Config::default(), db.pool);
    (build_app(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}

fn get(path: &str) -> Request<Body> {
    Request::builder().uri(path).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_collection_exists_by_logical_name() {
    let (app, _state) = test_app().await;

    for name in ["sessions", "guests", "staff", "offers", "menu_items", "menu_session_map", "franchises"] {
        let (status, body) =
            send(&app, get(&format!("/api/rpc/collection-exists?name={name}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!(true), "collection {name} should exist");
    }

    // Unknown names are false, not an error
    let (status, body) = send(&app, get("/api/rpc/collection-exists?name=payroll")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!(false));
}

fn offer_create(code: &str) -> OfferCreate {
    OfferCreate {
        code: code.to_string(),
        name: "Festival 20".to_string(),
        offer_type: "festival".to_string(),
        discount_type: DiscountType::Percentage,
        discount_value: 20.0,
        valid_from: None,
        valid_until: None,
        max_redemptions: Some(100),
        guest_segments: vec!["VIP".to_string()],
        franchise_ids: vec![],
        channels: vec!["whatsapp".to_string()],
    }
}

#[tokio::test]
async fn test_offer_analytics_counts_and_summary() {
    let (app, state) = test_app().await;

    let offer_a = offer::create(&state.pool, offer_create("FEST20")).await.unwrap();
    let offer_b = offer::create(&state.pool, offer_create("WIN10")).await.unwrap();

    for _ in 0..3 {
        offer::record_event(&state.pool, offer_a.id, OfferEventType::Sent, Some("whatsapp"))
            .await
            .unwrap();
    }
    offer::record_event(&state.pool, offer_a.id, OfferEventType::Viewed, None)
        .await
        .unwrap();
    offer::record_event(&state.pool, offer_a.id, OfferEventType::Redeemed, None)
        .await
        .unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/rpc/offer-analytics")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({"offerIds": [offer_a.id, offer_b.id]}).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);

    let per_offer = body["data"]["perOffer"].as_array().unwrap();
    assert_eq!(per_offer.len(), 2);
    assert_eq!(per_offer[0]["sent"], json!(3));
    assert_eq!(per_offer[0]["viewed"], json!(1));
    assert_eq!(per_offer[0]["redeemed"], json!(1));
    // No events: zeroed row, not missing
    assert_eq!(per_offer[1]["sent"], json!(0));

    let summary = &body["data"]["summary"];
    assert_eq!(summary["totalSent"], json!(3));
    assert_eq!(summary["totalRedeemed"], json!(1));
    assert!((summary["redemptionRate"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-9);

    // Redemption bumped the offer counter itself
    let refreshed = offer::find_by_id(&state.pool, offer_a.id).await.unwrap().unwrap();
    assert_eq!(refreshed.redemption_count, 1);
}

#[tokio::test]
async fn test_offer_analytics_rejects_empty_ids() {
    let (app, _state) = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/rpc/offer-analytics")
        .header("content-type", "application/json")
        .body(Body::from(json!({"offerIds": []}).to_string()))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("E0002"));
}
