use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::error::EligibilityError;
use super::precheck::PrecheckRequest;
use super::service::{EligibilityService, EvaluationRequest, ServiceError, VerdictView};
use super::verification::{FlightDataProvider, FlightQuery};

/// Router builder exposing the evaluate, verify and precheck endpoints.
pub fn eligibility_router<P>(service: Arc<EligibilityService<P>>) -> Router
where
    P: FlightDataProvider + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/evaluate", post(evaluate_handler::<P>))
        .route("/api/v1/flights/verify", post(verify_handler::<P>))
        .route("/api/v1/precheck", post(precheck_handler::<P>))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<P>(
    State(service): State<Arc<EligibilityService<P>>>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Response
where
    P: FlightDataProvider + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.evaluate(&request) {
        Ok(verdict) => (StatusCode::OK, Json(VerdictView::from(verdict))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn verify_handler<P>(
    State(service): State<Arc<EligibilityService<P>>>,
    payload: Result<Json<FlightQuery>, JsonRejection>,
) -> Response
where
    P: FlightDataProvider + 'static,
{
    let Json(query) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.verify(&query) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn precheck_handler<P>(
    State(service): State<Arc<EligibilityService<P>>>,
    payload: Result<Json<PrecheckRequest>, JsonRejection>,
) -> Response
where
    P: FlightDataProvider + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return rejection_response(rejection),
    };
    match service.precheck(&request) {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    let (status, kind) = match &error {
        ServiceError::Eligibility(EligibilityError::UnknownAirport(_)) => {
            (StatusCode::BAD_REQUEST, "unknown_airport")
        }
        ServiceError::Eligibility(EligibilityError::InvalidRecord(_)) => {
            (StatusCode::BAD_REQUEST, "invalid_record")
        }
        ServiceError::Eligibility(EligibilityError::AssumedDelayOutOfRange { .. }) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "precheck_misconfigured")
        }
        ServiceError::Provider(_) => (StatusCode::BAD_GATEWAY, "provider_unavailable"),
    };

    error_body(status, kind, error.to_string())
}

/// Bodies that deserialize as JSON but break a record rule (bad IATA code, discontiguous or
/// backwards legs) are invalid records, same as errors raised by the engine itself.
fn rejection_response(rejection: JsonRejection) -> Response {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            error_body(StatusCode::BAD_REQUEST, "invalid_record", err.body_text())
        }
        JsonRejection::JsonSyntaxError(err) => {
            error_body(StatusCode::BAD_REQUEST, "malformed_json", err.body_text())
        }
        other => error_body(other.status(), "unsupported_request", other.body_text()),
    }
}

fn error_body(status: StatusCode, kind: &str, detail: String) -> Response {
    let payload = json!({
        "error": kind,
        "detail": detail,
    });
    (status, Json(payload)).into_response()
}
