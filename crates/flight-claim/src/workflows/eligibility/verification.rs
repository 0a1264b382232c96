use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{FlightLeg, IataCode};

/// Flight lookup submitted by the verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightQuery {
    pub flight_number: String,
    pub date: NaiveDate,
    pub from: IataCode,
    pub to: IataCode,
}

/// What the provider knows about how a flight ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum FlightOutcome {
    Arrived { at: DateTime<Utc> },
    Cancelled { notice_given_at: Option<DateTime<Utc>> },
    NeverArrived,
}

/// Scheduled leg plus its observed outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightStatus {
    pub leg: FlightLeg,
    pub outcome: FlightOutcome,
}

/// Seam for the external flight-data provider.
pub trait FlightDataProvider: Send + Sync {
    /// Short identifier echoed back to callers as the data source.
    fn source(&self) -> &str;

    fn lookup(&self, query: &FlightQuery) -> Result<Option<FlightStatus>, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("flight data provider unavailable: {0}")]
    Unavailable(String),
    #[error("flight data provider returned malformed data: {0}")]
    Malformed(String),
}

/// Canned outcomes for the mock provider, registered explicitly per flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "scenario")]
pub enum MockScenario {
    OnTime,
    Delayed { minutes: i64 },
    Cancelled { notice_days: i64 },
    NeverArrived,
    Unknown,
}

const MOCK_DEPARTURE_HOUR: u32 = 9;
const MOCK_BLOCK_MINUTES: i64 = 150;

/// In-memory provider returning whatever scenario was registered for a flight and date.
#[derive(Debug, Clone)]
pub struct MockFlightDataProvider {
    flights: HashMap<(String, NaiveDate), MockScenario>,
    fallback: MockScenario,
}

impl Default for MockFlightDataProvider {
    fn default() -> Self {
        Self::new(MockScenario::Unknown)
    }
}

impl MockFlightDataProvider {
    /// `fallback` applies to flights with no registered scenario.
    pub fn new(fallback: MockScenario) -> Self {
        Self {
            flights: HashMap::new(),
            fallback,
        }
    }

    pub fn with_flight(
        mut self,
        flight_number: &str,
        date: NaiveDate,
        scenario: MockScenario,
    ) -> Self {
        self.flights
            .insert((normalize_flight_number(flight_number), date), scenario);
        self
    }

    fn scenario_for(&self, query: &FlightQuery) -> MockScenario {
        self.flights
            .get(&(normalize_flight_number(&query.flight_number), query.date))
            .copied()
            .unwrap_or(self.fallback)
    }

    fn scheduled_leg(query: &FlightQuery) -> Result<FlightLeg, ProviderError> {
        let departure = query
            .date
            .and_hms_opt(MOCK_DEPARTURE_HOUR, 0, 0)
            .ok_or_else(|| ProviderError::Malformed(format!("invalid date {}", query.date)))?
            .and_utc();
        let flight_number = normalize_flight_number(&query.flight_number);
        let airline = flight_number.chars().take(2).collect();

        Ok(FlightLeg {
            origin: query.from.clone(),
            destination: query.to.clone(),
            scheduled_departure: departure,
            scheduled_arrival: departure + Duration::minutes(MOCK_BLOCK_MINUTES),
            airline,
            flight_number,
        })
    }
}

impl FlightDataProvider for MockFlightDataProvider {
    fn source(&self) -> &str {
        "mock"
    }

    fn lookup(&self, query: &FlightQuery) -> Result<Option<FlightStatus>, ProviderError> {
        let scenario = self.scenario_for(query);
        if scenario == MockScenario::Unknown {
            return Ok(None);
        }

        let leg = Self::scheduled_leg(query)?;
        let outcome = match scenario {
            MockScenario::OnTime => FlightOutcome::Arrived {
                at: leg.scheduled_arrival,
            },
            MockScenario::Delayed { minutes } => FlightOutcome::Arrived {
                at: leg.scheduled_arrival + Duration::minutes(minutes),
            },
            MockScenario::Cancelled { notice_days } => FlightOutcome::Cancelled {
                notice_given_at: Some(leg.scheduled_departure - Duration::days(notice_days)),
            },
            MockScenario::NeverArrived => FlightOutcome::NeverArrived,
            MockScenario::Unknown => return Ok(None),
        };

        Ok(Some(FlightStatus { leg, outcome }))
    }
}

fn normalize_flight_number(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase()
}
