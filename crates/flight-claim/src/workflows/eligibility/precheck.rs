use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::domain::{
    ActualArrival, DisruptionRecord, EligibilityVerdict, FlightLeg, IataCode, Itinerary,
    MitigationFlags,
};
use super::engine::EligibilityEngine;
use super::error::EligibilityError;

const PLACEHOLDER_DEPARTURE_HOUR: i64 = 12;
const PLACEHOLDER_BLOCK_MINUTES: i64 = 120;

/// Longest delay a precheck may assume: one week.
pub const MAX_ASSUMED_DELAY_MINUTES: i64 = 7 * 24 * 60;

/// Early, low-confidence estimate inputs collected before the full wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecheckRequest {
    pub from: IataCode,
    pub to: IataCode,
    pub date: NaiveDate,
    #[serde(default)]
    pub flight_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecheckResponse {
    pub eligible: bool,
    pub reason: String,
    pub amount: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecheckConfig {
    /// Arrival delay assumed when the real outcome is not known yet.
    pub assumed_delay_minutes: i64,
}

impl PrecheckConfig {
    pub fn assumed_delay_in_range(minutes: i64) -> bool {
        (1..=MAX_ASSUMED_DELAY_MINUTES).contains(&minutes)
    }
}

impl Default for PrecheckConfig {
    fn default() -> Self {
        Self {
            assumed_delay_minutes: 180,
        }
    }
}

/// Runs the full engine against a synthetic direct flight delayed by the assumed amount.
pub fn precheck(
    engine: &EligibilityEngine,
    config: &PrecheckConfig,
    request: &PrecheckRequest,
) -> Result<PrecheckResponse, EligibilityError> {
    let departure = request.date.and_time(NaiveTime::MIN).and_utc()
        + Duration::hours(PLACEHOLDER_DEPARTURE_HOUR);
    let scheduled_arrival = departure + Duration::minutes(PLACEHOLDER_BLOCK_MINUTES);
    let flight_number = request.flight_number.clone().unwrap_or_default();

    let itinerary = Itinerary::direct(FlightLeg {
        origin: request.from.clone(),
        destination: request.to.clone(),
        scheduled_departure: departure,
        scheduled_arrival,
        airline: flight_number.chars().take(2).collect(),
        flight_number,
    })?;

    let minutes = config.assumed_delay_minutes;
    let arrival = Some(minutes)
        .filter(|minutes| PrecheckConfig::assumed_delay_in_range(*minutes))
        .and_then(Duration::try_minutes)
        .and_then(|delay| scheduled_arrival.checked_add_signed(delay))
        .ok_or(EligibilityError::AssumedDelayOutOfRange { minutes })?;
    let record = DisruptionRecord::delayed(itinerary, 0, ActualArrival::Arrived(arrival));
    let verdict = engine.evaluate(&record, &MitigationFlags::default())?;

    Ok(PrecheckResponse::from(&verdict))
}

impl From<&EligibilityVerdict> for PrecheckResponse {
    fn from(verdict: &EligibilityVerdict) -> Self {
        let eligible = verdict.is_eligible();
        Self {
            eligible,
            reason: verdict.reason.tag().to_string(),
            amount: if eligible {
                verdict.amount.as_ref().map(ToString::to_string)
            } else {
                None
            },
        }
    }
}
