use chrono::{Duration, NaiveDate};
use flight_claim::config::EligibilitySettings;
use flight_claim::error::AppError;
use flight_claim::workflows::airports::AirportDirectory;
use flight_claim::workflows::eligibility::{
    EligibilityEngine, EligibilityService, IataCode, MockFlightDataProvider, MockScenario,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Reference data is read once here and shared read-only from then on.
pub(crate) fn load_airports(settings: &EligibilitySettings) -> Result<AirportDirectory, AppError> {
    let directory = match &settings.airports_csv {
        Some(path) => {
            info!(path = %path.display(), "loading airport dataset from file");
            AirportDirectory::from_path(path)?
        }
        None => AirportDirectory::embedded()?,
    };
    Ok(directory)
}

pub(crate) fn build_engine(settings: &EligibilitySettings) -> Result<EligibilityEngine, AppError> {
    let airports = Arc::new(load_airports(settings)?);
    let engine = EligibilityEngine::new(airports, settings.compensation.clone())?;
    Ok(engine)
}

pub(crate) fn build_service(
    settings: &EligibilitySettings,
    today: NaiveDate,
) -> Result<EligibilityService<MockFlightDataProvider>, AppError> {
    let engine = Arc::new(build_engine(settings)?);
    let provider = Arc::new(demo_flight_provider(today));
    Ok(EligibilityService::new(engine, provider, settings.precheck))
}

/// Stand-in for the flight-data provider until a real integration exists.
pub(crate) fn demo_flight_provider(today: NaiveDate) -> MockFlightDataProvider {
    let yesterday = today - Duration::days(1);
    MockFlightDataProvider::default()
        .with_flight("SK909", yesterday, MockScenario::Delayed { minutes: 215 })
        .with_flight("SK911", yesterday, MockScenario::Delayed { minutes: 90 })
        .with_flight("SK1417", yesterday, MockScenario::Cancelled { notice_days: 3 })
        .with_flight("SK1419", yesterday, MockScenario::Cancelled { notice_days: 21 })
        .with_flight("SK925", yesterday, MockScenario::NeverArrived)
        .with_flight("SK1", yesterday, MockScenario::OnTime)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_iata(raw: &str) -> Result<IataCode, String> {
    IataCode::parse(raw).map_err(|err| err.to_string())
}
