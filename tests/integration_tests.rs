use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceExt;

use mintbooth::config::AppConfig;
use mintbooth::db;
use mintbooth::handlers;
use mintbooth::state::AppState;

// ── Helpers ──

fn test_state() -> Arc<AppState> {
    let config = AppConfig {
        port: 3000,
        database_url: ":memory:".to_string(),
    };
    let conn = db::init_db(":memory:").unwrap();
    Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config,
    })
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/bookings",
            get(handlers::catalog::get_catalog).post(handlers::bookings::create_booking),
        )
        .route(
            "/api/bookings/:reference",
            get(handlers::bookings::get_booking),
        )
        .route(
            "/api/availability",
            get(handlers::bookings::check_availability),
        )
        .route("/api/admin/bookings", get(handlers::admin::list_bookings))
        .route(
            "/api/admin/bookings/:id/status",
            post(handlers::admin::update_booking_status),
        )
        .with_state(state)
}

fn booking_payload(time: &str) -> serde_json::Value {
    serde_json::json!({
        "customerName": "Alice Example",
        "customerEmail": "alice@example.com",
        "customerPhone": "+15551110000",
        "eventDate": "2026-09-12",
        "eventTime": time,
        "eventType": "Wedding",
        "guestCount": 80,
        "venueAddress": "12 Garden Way",
        "packageId": 1,
        "addonQuantities": {},
        "specialRequests": "Gold backdrop if possible"
    })
}

async fn post_json(
    app: Router,
    uri: &str,
    payload: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let res = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let state = test_state();
    let (status, json) = get_json(test_app(state), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

// ── Catalog ──

#[tokio::test]
async fn test_catalog_is_seeded() {
    let state = test_state();
    let (status, json) = get_json(test_app(state), "/api/bookings").await;

    assert_eq!(status, StatusCode::OK);
    let packages = json["packages"].as_array().unwrap();
    let addons = json["addons"].as_array().unwrap();
    assert_eq!(packages.len(), 3);
    assert_eq!(addons.len(), 9);

    // Ordered by price, cheapest first.
    assert_eq!(packages[0]["name"], "Mint Pro");
    assert_eq!(packages[0]["price"], 29900);
    assert_eq!(packages[0]["duration_hours"], 2);
    assert_eq!(packages[2]["name"], "Mint Ultra");

    let attendant = addons
        .iter()
        .find(|a| a["id"] == 1)
        .expect("Booth Attendant in catalog");
    assert_eq!(attendant["is_hourly"], true);
    assert_eq!(attendant["available_packages"], serde_json::json!([1, 2, 3]));
}

// ── Booking submission ──

#[tokio::test]
async fn test_create_booking_success() {
    let state = test_state();
    let (status, json) = post_json(
        test_app(state.clone()),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["totalAmount"], 29900);

    let reference = json["bookingReference"].as_str().unwrap();
    assert_eq!(reference.len(), 11);
    assert!(reference.starts_with("MB"));

    // Round-trip through the lookup endpoint.
    let (status, json) = get_json(test_app(state), &format!("/api/bookings/{reference}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["customer_name"], "Alice Example");
    assert_eq!(json["event_time"], "14:00:00");
    assert_eq!(json["status"], "pending");
    assert_eq!(json["subtotal"], 29900);
    assert_eq!(json["total_amount"], 29900);
}

#[tokio::test]
async fn test_create_booking_with_addons_priced_server_side() {
    let state = test_state();
    let mut payload = booking_payload("2:00 PM");
    payload["addonQuantities"] = serde_json::json!({ "1": 3, "9": 1 });
    // Client-supplied totals must be ignored outright.
    payload["totalAmount"] = serde_json::json!(1);
    payload["subtotal"] = serde_json::json!(1);

    let (status, json) = post_json(test_app(state), "/api/bookings", &payload).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalAmount"], 54400);
}

#[tokio::test]
async fn test_create_booking_missing_fields() {
    let state = test_state();

    for field in ["customerName", "customerEmail", "eventDate", "eventTime", "packageId"] {
        let mut payload = booking_payload("2:00 PM");
        payload.as_object_mut().unwrap().remove(field);

        let (status, json) = post_json(test_app(state.clone()), "/api/bookings", &payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "field {field}");
        assert_eq!(json["success"], false);
        assert!(
            json["message"].as_str().unwrap().contains(field),
            "message should name {field}, got {}",
            json["message"]
        );
    }
}

#[tokio::test]
async fn test_create_booking_malformed_time() {
    let state = test_state();
    let (status, json) = post_json(
        test_app(state),
        "/api/bookings",
        &booking_payload("14:00"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_create_booking_unknown_package() {
    let state = test_state();
    let mut payload = booking_payload("2:00 PM");
    payload["packageId"] = serde_json::json!(999);

    let (status, json) = post_json(test_app(state), "/api/bookings", &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_create_booking_slot_conflict() {
    let state = test_state();

    let (status, _) = post_json(
        test_app(state.clone()),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Same slot again: 409, and nothing new persisted.
    let (status, json) = post_json(
        test_app(state.clone()),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["success"], false);

    let (_, json) = get_json(test_app(state.clone()), "/api/admin/bookings").await;
    assert_eq!(json["count"], 1);

    // A different time the same day is fine.
    let (status, _) = post_json(
        test_app(state),
        "/api/bookings",
        &booking_payload("6:00 PM"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_booking_constraint_violation() {
    let state = test_state();
    let mut payload = booking_payload("2:00 PM");
    // Four attendant hours against a two-hour package, no extension.
    payload["addonQuantities"] = serde_json::json!({ "1": 4 });

    let (status, json) = post_json(test_app(state.clone()), "/api/bookings", &payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    let violations = json["violations"].as_array().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0]["addon_id"], 1);
    assert_eq!(violations[0]["requested"], 4);
    assert_eq!(violations[0]["max_allowed"], 2);

    // No partial write.
    let (_, json) = get_json(test_app(state), "/api/admin/bookings").await;
    assert_eq!(json["count"], 0);
}

#[tokio::test]
async fn test_get_booking_not_found() {
    let state = test_state();
    let (status, json) = get_json(test_app(state), "/api/bookings/MB000000XXX").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

// ── Availability ──

#[tokio::test]
async fn test_availability_endpoint() {
    let state = test_state();

    let (status, json) = get_json(
        test_app(state.clone()),
        "/api/availability?date=2026-09-12&time=2:00%20PM",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["available"], true);

    let (status, _) = post_json(
        test_app(state.clone()),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = get_json(
        test_app(state.clone()),
        "/api/availability?date=2026-09-12&time=2:00%20PM",
    )
    .await;
    assert_eq!(json["available"], false);

    let (_, json) = get_json(
        test_app(state),
        "/api/availability?date=2026-09-12&time=3:00%20PM",
    )
    .await;
    assert_eq!(json["available"], true);
}

#[tokio::test]
async fn test_availability_requires_date_and_time() {
    let state = test_state();

    let (status, _) = get_json(test_app(state.clone()), "/api/availability?date=2026-09-12").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(test_app(state), "/api/availability?time=2:00%20PM").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Admin ──

#[tokio::test]
async fn test_admin_list_bookings() {
    let state = test_state();

    post_json(
        test_app(state.clone()),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;

    let (status, json) = get_json(test_app(state), "/api/admin/bookings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["count"], 1);
    let booking = &json["bookings"][0];
    assert_eq!(booking["customer_name"], "Alice Example");
    assert_eq!(booking["package_name"], "Mint Pro");
    assert_eq!(booking["status"], "pending");
}

#[tokio::test]
async fn test_admin_status_filter() {
    let state = test_state();

    post_json(
        test_app(state.clone()),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;

    let (_, json) = get_json(
        test_app(state.clone()),
        "/api/admin/bookings?status=confirmed",
    )
    .await;
    assert_eq!(json["count"], 0);

    let (_, json) = get_json(test_app(state), "/api/admin/bookings?status=pending").await;
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn test_admin_update_status() {
    let state = test_state();

    post_json(
        test_app(state.clone()),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;
    let (_, json) = get_json(test_app(state.clone()), "/api/admin/bookings").await;
    let id = json["bookings"][0]["id"].as_i64().unwrap();

    let (status, json) = post_json(
        test_app(state.clone()),
        &format!("/api/admin/bookings/{id}/status"),
        &serde_json::json!({ "status": "confirmed" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["booking"]["status"], "confirmed");

    let (_, json) = get_json(test_app(state), "/api/admin/bookings").await;
    assert_eq!(json["bookings"][0]["status"], "confirmed");
}

#[tokio::test]
async fn test_admin_update_status_rejects_unknown_status() {
    let state = test_state();

    post_json(
        test_app(state.clone()),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;
    let (_, json) = get_json(test_app(state.clone()), "/api/admin/bookings").await;
    let id = json["bookings"][0]["id"].as_i64().unwrap();

    let (status, _) = post_json(
        test_app(state),
        &format!("/api/admin/bookings/{id}/status"),
        &serde_json::json!({ "status": "paid" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_update_status_unknown_booking() {
    let state = test_state();

    let (status, _) = post_json(
        test_app(state),
        "/api/admin/bookings/9999/status",
        &serde_json::json!({ "status": "confirmed" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancelling_frees_the_slot() {
    let state = test_state();

    post_json(
        test_app(state.clone()),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;
    let (_, json) = get_json(test_app(state.clone()), "/api/admin/bookings").await;
    let id = json["bookings"][0]["id"].as_i64().unwrap();

    post_json(
        test_app(state.clone()),
        &format!("/api/admin/bookings/{id}/status"),
        &serde_json::json!({ "status": "cancelled" }),
    )
    .await;

    // The slot opens back up once the booking is cancelled.
    let (status, _) = post_json(
        test_app(state),
        "/api/bookings",
        &booking_payload("2:00 PM"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}
