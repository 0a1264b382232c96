use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::airports::AirportDirectory;
use crate::workflows::eligibility::domain::{
    DisruptionAssessment, DisruptionCategory, FlightLeg, IataCode, Itinerary,
};
use crate::workflows::eligibility::verification::{
    FlightDataProvider, FlightQuery, FlightStatus, MockFlightDataProvider, MockScenario,
    ProviderError,
};
use crate::workflows::eligibility::{
    CompensationConfig, EligibilityEngine, EligibilityService, PrecheckConfig,
};

pub(super) fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn code(raw: &str) -> IataCode {
    IataCode::parse(raw).expect("valid code")
}

pub(super) fn leg(
    origin: &str,
    destination: &str,
    departs: DateTime<Utc>,
    arrives: DateTime<Utc>,
) -> FlightLeg {
    FlightLeg {
        origin: code(origin),
        destination: code(destination),
        scheduled_departure: departs,
        scheduled_arrival: arrives,
        airline: "SK".to_string(),
        flight_number: format!("SK{origin}{destination}"),
    }
}

/// CPH 10:00 -> JFK 18:30 on 15 June.
pub(super) fn cph_jfk() -> Itinerary {
    Itinerary::direct(leg("CPH", "JFK", at(15, 10, 0), at(15, 18, 30))).expect("valid itinerary")
}

/// CPH 07:00 -> ARN 08:10 on 15 June.
pub(super) fn cph_arn() -> Itinerary {
    Itinerary::direct(leg("CPH", "ARN", at(15, 7, 0), at(15, 8, 10))).expect("valid itinerary")
}

/// CPH 06:00 -> FRA 07:30, FRA 09:30 -> JFK 12:15 (local times ignored, all UTC).
pub(super) fn cph_fra_jfk() -> Itinerary {
    Itinerary::new(vec![
        leg("CPH", "FRA", at(15, 6, 0), at(15, 7, 30)),
        leg("FRA", "JFK", at(15, 9, 30), at(15, 17, 15)),
    ])
    .expect("valid itinerary")
}

pub(super) fn engine() -> EligibilityEngine {
    let airports = AirportDirectory::embedded().expect("embedded airports load");
    EligibilityEngine::new(Arc::new(airports), CompensationConfig::default())
        .expect("default config is valid")
}

pub(super) fn compensation_config() -> CompensationConfig {
    CompensationConfig::default()
}

pub(super) fn assessment(category: DisruptionCategory) -> DisruptionAssessment {
    DisruptionAssessment {
        category,
        arrival_delay_minutes: None,
        notice_days: None,
        volunteered: false,
        ambiguity: None,
    }
}

pub(super) fn flight_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date")
}

pub(super) fn query(flight_number: &str, from: &str, to: &str) -> FlightQuery {
    FlightQuery {
        flight_number: flight_number.to_string(),
        date: flight_date(),
        from: code(from),
        to: code(to),
    }
}

pub(super) fn mock_provider() -> MockFlightDataProvider {
    MockFlightDataProvider::default()
        .with_flight("SK909", flight_date(), MockScenario::Delayed { minutes: 215 })
        .with_flight("SK911", flight_date(), MockScenario::Delayed { minutes: 90 })
        .with_flight("SK1417", flight_date(), MockScenario::Cancelled { notice_days: 3 })
        .with_flight("SK1419", flight_date(), MockScenario::Cancelled { notice_days: 21 })
        .with_flight("SK925", flight_date(), MockScenario::NeverArrived)
        .with_flight("SK1", flight_date(), MockScenario::OnTime)
}

pub(super) fn build_service() -> EligibilityService<MockFlightDataProvider> {
    EligibilityService::new(
        Arc::new(engine()),
        Arc::new(mock_provider()),
        PrecheckConfig::default(),
    )
}

pub(super) struct OfflineProvider;

impl FlightDataProvider for OfflineProvider {
    fn source(&self) -> &str {
        "offline"
    }

    fn lookup(&self, _query: &FlightQuery) -> Result<Option<FlightStatus>, ProviderError> {
        Err(ProviderError::Unavailable("upstream timeout".to_string()))
    }
}

pub(super) fn offline_service() -> EligibilityService<OfflineProvider> {
    EligibilityService::new(
        Arc::new(engine()),
        Arc::new(OfflineProvider),
        PrecheckConfig::default(),
    )
}

pub(super) fn minutes(value: i64) -> Duration {
    Duration::minutes(value)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 4096)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
