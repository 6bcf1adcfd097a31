use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;
use wayfarer_api::{app, AppState};
use wayfarer_booking::{InMemoryReservationStore, Reservations};
use wayfarer_catalog::InMemoryTripRepository;
use wayfarer_store::app_config::RateLimitConfig;
use wayfarer_store::RedisClient;

async fn test_app() -> Router {
    let store = Arc::new(InMemoryReservationStore::new());
    let trips = Arc::new(InMemoryTripRepository::new());
    let redis = RedisClient::new("redis://127.0.0.1:6390").await.unwrap();

    let state = AppState {
        trips,
        reservations: Reservations::new(store),
        redis: Arc::new(redis),
        rate_limit: RateLimitConfig {
            max_requests: 1000,
            window_seconds: 60,
        },
    };

    app(state).layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 7000))))
}

fn trip_payload(name: &str, location: &str) -> Value {
    json!({
        "name": name,
        "description": "A week in the hills",
        "location": location,
        "duration": "7 days",
        "category": "hiking",
        "tourType": "GROUP",
        "priceCents": 129900,
        "imageUrls": ["https://cdn.example.com/1.jpg"],
        "itineraries": [
            {"dayNumber": 1, "location": "Glasgow", "title": "Arrival"},
            {"dayNumber": 2, "location": "Fort William", "title": "First summit"}
        ],
        "availabilities": [
            {"travelDate": "2025-07-14", "maxTravelers": 12,
             "adultPriceCents": 15000, "childPriceCents": 9000}
        ]
    })
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<&Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    router.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_and_get_trip() {
    let router = test_app().await;

    let response = send(
        &router,
        Method::POST,
        "/v1/trips",
        Some(&trip_payload("Highland Trek", "Scotland")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response).await;
    assert_eq!(created["name"], "Highland Trek");
    assert_eq!(created["itineraries"].as_array().unwrap().len(), 2);
    assert_eq!(created["availabilities"][0]["bookedCount"], 0);

    let trip_id = created["id"].as_str().unwrap();
    let response = send(&router, Method::GET, &format!("/v1/trips/{trip_id}"), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched["id"], created["id"]);
}

#[tokio::test]
async fn test_list_trips_with_filters() {
    let router = test_app().await;
    send(
        &router,
        Method::POST,
        "/v1/trips",
        Some(&trip_payload("Highland Trek", "Scotland")),
    )
    .await;
    send(
        &router,
        Method::POST,
        "/v1/trips",
        Some(&trip_payload("Desert Safari", "Morocco")),
    )
    .await;

    let response = send(&router, Method::GET, "/v1/trips?search=trek", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["name"], "Highland Trek");
    assert_eq!(listed[0]["imageUrls"].as_array().unwrap().len(), 1);

    let response = send(&router, Method::GET, "/v1/trips?location=morocco", None).await;
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["location"], "Morocco");

    let response = send(&router, Method::GET, "/v1/trips", None).await;
    let listed = body_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_update_trip_scalars_and_images() {
    let router = test_app().await;
    let created = body_json(
        send(
            &router,
            Method::POST,
            "/v1/trips",
            Some(&trip_payload("Highland Trek", "Scotland")),
        )
        .await,
    )
    .await;
    let trip_id = created["id"].as_str().unwrap().to_string();

    let update = json!({
        "name": "Highland Trek Deluxe",
        "imageUrls": ["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"]
    });
    let response = send(
        &router,
        Method::PUT,
        &format!("/v1/trips/{trip_id}"),
        Some(&update),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Highland Trek Deluxe");
    assert_eq!(updated["images"].as_array().unwrap().len(), 2);
    // Availability survives a catalog edit untouched.
    assert_eq!(updated["availabilities"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_trip() {
    let router = test_app().await;
    let created = body_json(
        send(
            &router,
            Method::POST,
            "/v1/trips",
            Some(&trip_payload("Highland Trek", "Scotland")),
        )
        .await,
    )
    .await;
    let trip_id = created["id"].as_str().unwrap().to_string();

    let response = send(
        &router,
        Method::DELETE,
        &format!("/v1/trips/{trip_id}"),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&router, Method::GET, &format!("/v1/trips/{trip_id}"), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_trip_returns_not_found() {
    let router = test_app().await;
    let response = send(
        &router,
        Method::GET,
        &format!("/v1/trips/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("not found"));
}
