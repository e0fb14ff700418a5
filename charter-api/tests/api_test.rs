use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use charter_api::{app, AppState};
use charter_core::QuotingSettings;
use charter_store::{InMemoryStore, RecordingNotifier};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app(settings: QuotingSettings) -> (Router, Arc<RecordingNotifier>) {
    let stores = Arc::new(InMemoryStore::new()).stores();
    let notifier = Arc::new(RecordingNotifier::new());
    let state = AppState::new(stores, notifier.clone(), settings);
    (app(state), notifier)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn seed_catalog(app: &Router) -> String {
    for (origin, destination) in [("DEL", "BOM"), ("BOM", "DEL")] {
        let (status, _) = call(
            app,
            Method::POST,
            "/v1/admin/routes",
            Some(json!({
                "origin": origin,
                "destination": destination,
                "distance_km": 1600.0,
                "estimated_time_hours": 2.1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = call(
        app,
        Method::POST,
        "/v1/admin/pricing-rules",
        Some(json!({
            "name": "Domestic",
            "margin_percentage": 10.0,
            "tax_rate": 18.0,
            "tax_label": "GST",
            "fees": {
                "fuel_surcharge_per_km": 10.0,
                "airport_fee_per_leg": 1500.0,
                "ground_handling_per_leg": 500.0
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, aircraft) = call(
        app,
        Method::POST,
        "/v1/admin/aircraft",
        Some(json!({
            "name": "Citation",
            "tail_number": "vt-cit",
            "category": "Mid",
            "hourly_rate": 5000.0,
            "specs": { "seats": 8, "speed_kmh": 800.0, "range_km": 4000.0 }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(aircraft["tail_number"], "VT-CIT");
    aircraft["id"].as_str().unwrap().to_string()
}

fn round_trip_inquiry() -> Value {
    json!({
        "customerName": "Meera Iyer",
        "customerEmail": "Meera@Example.com",
        "tripType": "round-trip",
        "legs": [{ "origin": "DEL", "destination": "BOM", "departureDate": "2030-03-14" }],
        "returnDate": "2030-03-17",
        "passengerCount": 4
    })
}

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app(QuotingSettings::default());
    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_search_returns_priced_aircraft() {
    let (app, _) = test_app(QuotingSettings::default());
    let aircraft_id = seed_catalog(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/quotes/search",
        Some(json!({
            "legs": [{ "origin": "del", "destination": "bom", "departureDate": "2030-03-14" }],
            "passengerCount": 4
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["aircraft"]["id"], aircraft_id.as_str());
    assert_eq!(results[0]["display"]["totalCost"], 39589.0);
    assert_eq!(results[0]["usedDefaultPricing"], false);
    assert_eq!(results[0]["display"]["formattedTotal"], "USD 39589.00");
    assert!(body["excluded"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_search_errors() {
    let (app, _) = test_app(QuotingSettings::default());
    seed_catalog(&app).await;

    // Over capacity for the only aircraft
    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/quotes/search",
        Some(json!({
            "legs": [{ "origin": "DEL", "destination": "BOM", "departureDate": "2030-03-14" }],
            "passengerCount": 20
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "NO_AIRCRAFT_MATCHED");
    assert_eq!(body["excluded"][0]["code"], "INSUFFICIENT_CAPACITY");

    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/quotes/search",
        Some(json!({ "legs": [], "passengerCount": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/quotes/search",
        Some(json!({
            "legs": [{ "origin": "DEL", "destination": "BOM", "departureDate": "2030-03-14" }],
            "passengerCount": 2,
            "aircraftId": uuid::Uuid::new_v4()
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inquiry_to_booking_flow() {
    let (app, notifier) = test_app(QuotingSettings::default());
    let aircraft_id = seed_catalog(&app).await;

    let (status, inquiry) = call(&app, Method::POST, "/v1/inquiries", Some(round_trip_inquiry())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(inquiry["status"], "new");
    let inquiry_id = inquiry["id"].as_str().unwrap().to_string();

    let (status, quote) = call(
        &app,
        Method::POST,
        &format!("/v1/inquiries/{inquiry_id}/quotes"),
        Some(json!({ "aircraftId": aircraft_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(quote["status"], "pending");
    assert_eq!(quote["legs"].as_array().unwrap().len(), 2);
    assert_eq!(quote["display"]["totalCost"], 79178.0);
    let quote_id = quote["id"].as_str().unwrap().to_string();

    let (_, inquiry) = call(&app, Method::GET, &format!("/v1/inquiries/{inquiry_id}"), None).await;
    assert_eq!(inquiry["status"], "quoted");

    let (status, listed) = call(&app, Method::GET, &format!("/v1/inquiries/{inquiry_id}/quotes"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    // Accepting before sending is not a valid transition
    let (status, _) = call(&app, Method::POST, &format!("/v1/quotes/{quote_id}/accept"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, quote) = call(&app, Method::POST, &format!("/v1/quotes/{quote_id}/send"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["status"], "sent");

    let (status, quote) = call(&app, Method::POST, &format!("/v1/quotes/{quote_id}/accept"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["status"], "accepted");

    let (status, booking) = call(&app, Method::POST, &format!("/v1/quotes/{quote_id}/booking"), None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["paymentStatus"], "pending");
    assert_eq!(booking["display"]["totalCost"], 79178.0);
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, Method::POST, &format!("/v1/quotes/{quote_id}/booking"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, inquiry) = call(&app, Method::GET, &format!("/v1/inquiries/{inquiry_id}"), None).await;
    assert_eq!(inquiry["status"], "converted");

    let (status, request) = call(
        &app,
        Method::POST,
        &format!("/v1/bookings/{booking_id}/reschedule"),
        Some(json!({ "legIndex": 1, "newDate": "2030-03-18", "reason": "meeting moved" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "pending");
    let request_id = request["id"].as_str().unwrap().to_string();

    let (status, booking) = call(
        &app,
        Method::POST,
        &format!("/v1/bookings/{booking_id}/reschedule/{request_id}/approve"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["legs"][1]["departureDate"], "2030-03-18");

    let (status, booking) = call(
        &app,
        Method::POST,
        &format!("/v1/bookings/{booking_id}/payment"),
        Some(json!({ "paymentStatus": "paid" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["paymentStatus"], "paid");

    let (status, booking) = call(
        &app,
        Method::POST,
        &format!("/v1/bookings/{booking_id}/status"),
        Some(json!({ "status": "scheduled" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["status"], "scheduled");

    let names = notifier.names();
    assert_eq!(names.first(), Some(&"inquiry.received"));
    assert!(names.contains(&"quote.issued"));
    assert!(names.contains(&"booking.confirmed"));
}

#[tokio::test]
async fn test_lapsed_quote_is_gone() {
    let settings = QuotingSettings {
        quote_validity: Duration::hours(-1),
        ..QuotingSettings::default()
    };
    let (app, _) = test_app(settings);
    let aircraft_id = seed_catalog(&app).await;

    let (_, inquiry) = call(&app, Method::POST, "/v1/inquiries", Some(round_trip_inquiry())).await;
    let inquiry_id = inquiry["id"].as_str().unwrap();
    let (_, quote) = call(
        &app,
        Method::POST,
        &format!("/v1/inquiries/{inquiry_id}/quotes"),
        Some(json!({ "aircraftId": aircraft_id })),
    )
    .await;
    let quote_id = quote["id"].as_str().unwrap();

    let (status, _) = call(&app, Method::POST, &format!("/v1/quotes/{quote_id}/send"), None).await;
    assert_eq!(status, StatusCode::GONE);

    let (_, quote) = call(&app, Method::GET, &format!("/v1/quotes/{quote_id}"), None).await;
    assert_eq!(quote["status"], "expired");
}

#[tokio::test]
async fn test_admin_crud_and_missing_resources() {
    let (app, _) = test_app(QuotingSettings::default());
    let aircraft_id = seed_catalog(&app).await;

    let (status, list) = call(&app, Method::GET, "/v1/admin/aircraft", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = call(
        &app,
        Method::PUT,
        &format!("/v1/admin/aircraft/{aircraft_id}"),
        Some(json!({
            "name": "Citation XLS",
            "tail_number": "VT-CIT",
            "category": "Mid",
            "hourly_rate": 5500.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Citation XLS");

    let (status, _) = call(&app, Method::DELETE, &format!("/v1/admin/aircraft/{aircraft_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = call(&app, Method::GET, &format!("/v1/admin/aircraft/{aircraft_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let missing = uuid::Uuid::new_v4();
    for uri in [
        format!("/v1/quotes/{missing}"),
        format!("/v1/bookings/{missing}"),
        format!("/v1/inquiries/{missing}"),
        format!("/v1/admin/pricing-rules/{missing}"),
    ] {
        let (status, _) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/inquiries",
        Some(json!({
            "customerName": "Meera Iyer",
            "customerEmail": "not-an-email",
            "tripType": "one-way",
            "legs": [{ "origin": "DEL", "destination": "BOM", "departureDate": "2030-03-14" }],
            "passengerCount": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_validity_bounds() {
    let (app, _) = test_app(QuotingSettings::default());
    let aircraft_id = seed_catalog(&app).await;

    let (_, inquiry) = call(&app, Method::POST, "/v1/inquiries", Some(round_trip_inquiry())).await;
    let uri = format!("/v1/inquiries/{}/quotes", inquiry["id"].as_str().unwrap());

    for hours in [json!(0), json!(721), json!(10_000_000_000i64), json!(i64::MAX)] {
        let (status, body) = call(
            &app,
            Method::POST,
            &uri,
            Some(json!({ "aircraftId": aircraft_id, "validForHours": hours })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "validForHours = {hours}");
        assert!(body["error"].is_string());
    }

    let (status, quote) = call(
        &app,
        Method::POST,
        &uri,
        Some(json!({ "aircraftId": aircraft_id, "validForHours": 720 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(quote["status"], "pending");
}

#[tokio::test]
async fn test_duplicate_route_is_rejected() {
    let (app, _) = test_app(QuotingSettings::default());
    seed_catalog(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/admin/routes",
        Some(json!({ "origin": "del", "destination": "bom", "distance_km": 1750.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("DEL -> BOM"));

    let (_, routes) = call(&app, Method::GET, "/v1/admin/routes", None).await;
    let routes = routes.as_array().unwrap();
    assert_eq!(routes.len(), 2);
    assert!(routes.iter().all(|r| r["distance_km"] == 1600.0));
}
