use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::InvalidRecordError;

/// Three-letter IATA airport identifier, always stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IataCode(String);

impl IataCode {
    pub fn parse(raw: &str) -> Result<Self, InvalidRecordError> {
        let normalized = normalize_code(raw);
        let valid = normalized.len() == 3 && normalized.bytes().all(|b| b.is_ascii_uppercase());
        if valid {
            Ok(Self(normalized))
        } else {
            Err(InvalidRecordError::InvalidIataCode(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize_code(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.trim().to_ascii_uppercase()
}

impl TryFrom<String> for IataCode {
    type Error = InvalidRecordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IataCode> for String {
    fn from(code: IataCode) -> Self {
        code.0
    }
}

impl fmt::Display for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference entry for an airport. Immutable once loaded into the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub code: IataCode,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
}

/// One scheduled segment of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub origin: IataCode,
    pub destination: IataCode,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub airline: String,
    pub flight_number: String,
}

/// Contiguous, non-empty sequence of legs. Only constructible through [`Itinerary::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FlightLeg>", into = "Vec<FlightLeg>")]
pub struct Itinerary {
    legs: Vec<FlightLeg>,
}

impl Itinerary {
    pub fn new(legs: Vec<FlightLeg>) -> Result<Self, InvalidRecordError> {
        if legs.is_empty() {
            return Err(InvalidRecordError::EmptyItinerary);
        }

        for (index, leg) in legs.iter().enumerate() {
            if leg.origin == leg.destination {
                return Err(InvalidRecordError::CircularLeg {
                    leg: index,
                    airport: leg.origin.clone(),
                });
            }
            if leg.scheduled_arrival <= leg.scheduled_departure {
                return Err(InvalidRecordError::ArrivalNotAfterDeparture { leg: index });
            }
        }

        for (index, pair) in legs.windows(2).enumerate() {
            if pair[0].destination != pair[1].origin {
                return Err(InvalidRecordError::DiscontiguousLegs {
                    leg: index + 1,
                    expected: pair[0].destination.clone(),
                    found: pair[1].origin.clone(),
                });
            }
        }

        Ok(Self { legs })
    }

    /// Convenience constructor for a single-leg journey.
    pub fn direct(leg: FlightLeg) -> Result<Self, InvalidRecordError> {
        Self::new(vec![leg])
    }

    pub fn legs(&self) -> &[FlightLeg] {
        &self.legs
    }

    pub fn leg(&self, index: usize) -> Option<&FlightLeg> {
        self.legs.get(index)
    }

    pub fn first_leg(&self) -> &FlightLeg {
        &self.legs[0]
    }

    pub fn last_leg(&self) -> &FlightLeg {
        &self.legs[self.legs.len() - 1]
    }

    pub fn origin(&self) -> &IataCode {
        &self.first_leg().origin
    }

    pub fn final_destination(&self) -> &IataCode {
        &self.last_leg().destination
    }

    pub fn scheduled_arrival(&self) -> DateTime<Utc> {
        self.last_leg().scheduled_arrival
    }

    pub fn is_connecting(&self) -> bool {
        self.legs.len() > 1
    }
}

impl TryFrom<Vec<FlightLeg>> for Itinerary {
    type Error = InvalidRecordError;

    fn try_from(legs: Vec<FlightLeg>) -> Result<Self, Self::Error> {
        Self::new(legs)
    }
}

impl From<Itinerary> for Vec<FlightLeg> {
    fn from(itinerary: Itinerary) -> Self {
        itinerary.legs
    }
}

/// What happened to the passenger's booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionKind {
    Delayed,
    Cancelled,
    DeniedBoarding,
}

/// Arrival at the final destination, or the sentinel for a passenger who never got there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "at")]
pub enum ActualArrival {
    Arrived(DateTime<Utc>),
    NeverArrived,
}

/// Normalized engine input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionRecord {
    pub itinerary: Itinerary,
    pub affected_leg_index: usize,
    pub kind: DisruptionKind,
    #[serde(default)]
    pub actual_arrival: Option<ActualArrival>,
    #[serde(default)]
    pub notice_given_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub volunteered: bool,
}

impl DisruptionRecord {
    pub fn delayed(itinerary: Itinerary, affected_leg_index: usize, arrival: ActualArrival) -> Self {
        Self {
            itinerary,
            affected_leg_index,
            kind: DisruptionKind::Delayed,
            actual_arrival: Some(arrival),
            notice_given_at: None,
            volunteered: false,
        }
    }

    pub fn cancelled(
        itinerary: Itinerary,
        affected_leg_index: usize,
        notice_given_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            itinerary,
            affected_leg_index,
            kind: DisruptionKind::Cancelled,
            actual_arrival: None,
            notice_given_at,
            volunteered: false,
        }
    }

    pub fn denied_boarding(itinerary: Itinerary, affected_leg_index: usize, volunteered: bool) -> Self {
        Self {
            itinerary,
            affected_leg_index,
            kind: DisruptionKind::DeniedBoarding,
            actual_arrival: None,
            notice_given_at: None,
            volunteered,
        }
    }
}

/// Facts outside the itinerary that can reduce or remove compensation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationFlags {
    #[serde(default)]
    pub extraordinary_circumstances: bool,
    #[serde(default)]
    pub reroute_arrival_delay_minutes: Option<i64>,
}

/// Regulation distance tier for the whole journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBand {
    Short,
    Medium,
    Long,
}

impl DistanceBand {
    pub const ALL: [DistanceBand; 3] = [DistanceBand::Short, DistanceBand::Medium, DistanceBand::Long];

    pub fn label(self) -> &'static str {
        match self {
            DistanceBand::Short => "short",
            DistanceBand::Medium => "medium",
            DistanceBand::Long => "long",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionCategory {
    Delay,
    DelayUnresolved,
    Cancellation,
    DeniedBoarding,
}

/// Arrival facts that exist but contradict the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousDelay {
    ArrivalBeforeDeparture,
}

/// Output of the disruption evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisruptionAssessment {
    pub category: DisruptionCategory,
    pub arrival_delay_minutes: Option<i64>,
    pub notice_days: Option<i64>,
    pub volunteered: bool,
    pub ambiguity: Option<AmbiguousDelay>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictKind {
    Eligible,
    NotEligible,
    Uncertain,
}

impl VerdictKind {
    pub fn label(self) -> &'static str {
        match self {
            VerdictKind::Eligible => "eligible",
            VerdictKind::NotEligible => "not_eligible",
            VerdictKind::Uncertain => "uncertain",
        }
    }
}

/// Enumerated explanation attached to every verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    DelayThresholdMet,
    DelayBelowThreshold,
    DelayUnresolved,
    AmbiguousArrivalData,
    CancellationShortNotice,
    CancellationRerouteMitigated,
    CancellationSufficientNotice,
    DeniedBoardingInvoluntary,
    DeniedBoardingVoluntary,
    ExtraordinaryCircumstances,
}

impl ReasonCode {
    pub fn tag(self) -> &'static str {
        match self {
            ReasonCode::DelayThresholdMet => "delay_threshold_met",
            ReasonCode::DelayBelowThreshold => "delay_below_threshold",
            ReasonCode::DelayUnresolved => "delay_unresolved",
            ReasonCode::AmbiguousArrivalData => "ambiguous_arrival_data",
            ReasonCode::CancellationShortNotice => "cancellation_short_notice",
            ReasonCode::CancellationRerouteMitigated => "cancellation_reroute_mitigated",
            ReasonCode::CancellationSufficientNotice => "cancellation_sufficient_notice",
            ReasonCode::DeniedBoardingInvoluntary => "denied_boarding_involuntary",
            ReasonCode::DeniedBoardingVoluntary => "denied_boarding_voluntary",
            ReasonCode::ExtraordinaryCircumstances => "extraordinary_circumstances",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: u32,
    pub currency: String,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Engine output. `amount` is only ever populated for eligible verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityVerdict {
    pub kind: VerdictKind,
    pub amount: Option<Money>,
    pub distance_band: DistanceBand,
    pub distance_km: f64,
    pub arrival_delay_minutes: Option<i64>,
    pub reason: ReasonCode,
}

impl EligibilityVerdict {
    pub fn is_eligible(&self) -> bool {
        self.kind == VerdictKind::Eligible
    }

    /// Passenger-facing wording. Amounts are only quoted for eligible verdicts.
    pub fn customer_message(&self) -> String {
        match (self.kind, &self.amount) {
            (VerdictKind::Eligible, Some(amount)) => {
                format!("Your flight qualifies for compensation of {amount}.")
            }
            (VerdictKind::Eligible, None) => "Your flight qualifies for compensation.".to_string(),
            (VerdictKind::NotEligible, _) => {
                "Based on the details provided, this flight does not qualify for compensation."
                    .to_string()
            }
            (VerdictKind::Uncertain, _) => {
                "We cannot confirm eligibility yet. We will review your flight and get back to you."
                    .to_string()
            }
        }
    }
}
