use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::eligibility::precheck::{PrecheckConfig, PrecheckRequest};
use crate::workflows::eligibility::router::{eligibility_router, precheck_handler, verify_handler};
use crate::workflows::eligibility::verification::MockFlightDataProvider;

fn post_json(uri: &str, payload: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn router() -> axum::Router {
    eligibility_router(Arc::new(build_service()))
}

#[tokio::test]
async fn evaluate_route_returns_verdict_with_message() {
    let payload = json!({
        "record": {
            "itinerary": [{
                "origin": "CPH",
                "destination": "JFK",
                "scheduled_departure": "2025-06-15T10:00:00Z",
                "scheduled_arrival": "2025-06-15T18:30:00Z",
                "airline": "SK",
                "flight_number": "SK909"
            }],
            "affected_leg_index": 0,
            "kind": "delayed",
            "actual_arrival": { "status": "arrived", "at": "2025-06-15T22:05:00Z" }
        }
    });

    let response = router()
        .oneshot(post_json("/api/v1/eligibility/evaluate", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["kind"], "eligible");
    assert_eq!(body["distance_band"], "long");
    assert_eq!(body["arrival_delay_minutes"], 215);
    assert_eq!(body["reason"], "delay_threshold_met");
    assert_eq!(body["amount"]["amount"], 600);
    assert!(body["message"].as_str().unwrap().contains("600 EUR"));
}

#[tokio::test]
async fn evaluate_route_rejects_discontiguous_itinerary() {
    let payload = json!({
        "record": {
            "itinerary": [
                {
                    "origin": "CPH",
                    "destination": "FRA",
                    "scheduled_departure": "2025-06-15T06:00:00Z",
                    "scheduled_arrival": "2025-06-15T07:30:00Z",
                    "airline": "SK",
                    "flight_number": "SK1"
                },
                {
                    "origin": "MUC",
                    "destination": "JFK",
                    "scheduled_departure": "2025-06-15T09:30:00Z",
                    "scheduled_arrival": "2025-06-15T17:15:00Z",
                    "airline": "LH",
                    "flight_number": "LH2"
                }
            ],
            "affected_leg_index": 0,
            "kind": "cancelled"
        }
    });

    let response = router()
        .oneshot(post_json("/api/v1/eligibility/evaluate", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "invalid_record");
    assert!(body["detail"].as_str().unwrap().contains("MUC"));
}

#[tokio::test]
async fn itinerary_and_leg_index_errors_share_one_shape() {
    let backwards_leg = json!({
        "record": {
            "itinerary": [{
                "origin": "CPH",
                "destination": "ARN",
                "scheduled_departure": "2025-06-15T09:00:00Z",
                "scheduled_arrival": "2025-06-15T08:00:00Z",
                "airline": "SK",
                "flight_number": "SK1"
            }],
            "affected_leg_index": 0,
            "kind": "denied_boarding"
        }
    });
    let leg_out_of_range = json!({
        "record": {
            "itinerary": [{
                "origin": "CPH",
                "destination": "ARN",
                "scheduled_departure": "2025-06-15T07:00:00Z",
                "scheduled_arrival": "2025-06-15T08:10:00Z",
                "airline": "SK",
                "flight_number": "SK1"
            }],
            "affected_leg_index": 5,
            "kind": "denied_boarding"
        }
    });

    for payload in [backwards_leg, leg_out_of_range] {
        let response = router()
            .oneshot(post_json("/api/v1/eligibility/evaluate", payload))
            .await
            .expect("route responds");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json_body(response).await;
        assert_eq!(body["error"], "invalid_record");
    }
}

#[tokio::test]
async fn evaluate_route_reports_malformed_json() {
    let request = Request::post("/api/v1/eligibility/evaluate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"record\": "))
        .expect("request builds");

    let response = router().oneshot(request).await.expect("route responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "malformed_json");
}

#[tokio::test]
async fn evaluate_route_maps_unknown_airport_to_bad_request() {
    let payload = json!({
        "record": {
            "itinerary": [{
                "origin": "CPH",
                "destination": "QQQ",
                "scheduled_departure": "2025-06-15T10:00:00Z",
                "scheduled_arrival": "2025-06-15T12:00:00Z",
                "airline": "SK",
                "flight_number": "SK1"
            }],
            "affected_leg_index": 0,
            "kind": "denied_boarding"
        }
    });

    let response = router()
        .oneshot(post_json("/api/v1/eligibility/evaluate", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "unknown_airport");
}

#[tokio::test]
async fn verify_route_uses_camel_case_contract() {
    let payload = json!({
        "flightNumber": "SK909",
        "date": "2025-06-15",
        "from": "CPH",
        "to": "JFK"
    });

    let response = router()
        .oneshot(post_json("/api/v1/flights/verify", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["matched"], true);
    assert_eq!(body["arrivalDelayMinutes"], 215);
    assert_eq!(body["cancelled"], false);
    assert_eq!(body["confidence"], "high");
    assert_eq!(body["source"], "mock");
}

#[tokio::test]
async fn verify_handler_returns_bad_gateway_when_provider_is_down() {
    let service = Arc::new(offline_service());

    let payload = Ok(axum::Json(query("SK909", "CPH", "JFK")));
    let response = verify_handler(State(service), payload).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn verify_handler_reports_unmatched_flights() {
    let service = Arc::new(crate::workflows::eligibility::EligibilityService::new(
        Arc::new(engine()),
        Arc::new(MockFlightDataProvider::default()),
        Default::default(),
    ));

    let payload = Ok(axum::Json(query("SK909", "CPH", "JFK")));
    let response = verify_handler(State(service), payload).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["matched"], false);
    assert_eq!(body["arrivalDelayMinutes"], Value::Null);
    assert_eq!(body["confidence"], "low");
}

#[tokio::test]
async fn precheck_route_returns_estimate() {
    let payload = json!({
        "from": "CPH",
        "to": "ARN",
        "date": "2025-06-15",
        "flightNumber": "SK1417"
    });

    let response = router()
        .oneshot(post_json("/api/v1/precheck", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["eligible"], true);
    assert_eq!(body["amount"], "250 EUR");
}

#[tokio::test]
async fn precheck_route_rejects_malformed_codes() {
    let payload = json!({ "from": "C1H", "to": "ARN", "date": "2025-06-15" });

    let response = router()
        .oneshot(post_json("/api/v1/precheck", payload))
        .await
        .expect("route responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "invalid_record");
}

#[tokio::test]
async fn precheck_handler_reports_unusable_assumed_delay() {
    let service = Arc::new(crate::workflows::eligibility::EligibilityService::new(
        Arc::new(engine()),
        Arc::new(MockFlightDataProvider::default()),
        PrecheckConfig {
            assumed_delay_minutes: i64::MAX,
        },
    ));
    let request = PrecheckRequest {
        from: code("CPH"),
        to: code("ARN"),
        date: flight_date(),
        flight_number: None,
    };

    let response = precheck_handler(State(service), Ok(axum::Json(request))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "precheck_misconfigured");
}
