use super::domain::IataCode;

/// Failures that stop an evaluation. Ambiguous but well-formed data never lands here; it is
/// reported as an `uncertain` verdict instead.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityError {
    #[error("unknown airport {0}")]
    UnknownAirport(IataCode),
    #[error("invalid disruption record: {0}")]
    InvalidRecord(#[from] InvalidRecordError),
    #[error("precheck assumed delay of {minutes} minutes is not usable")]
    AssumedDelayOutOfRange { minutes: i64 },
}

/// Structural problems with a disruption record or its itinerary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRecordError {
    #[error("'{0}' is not a three-letter IATA code")]
    InvalidIataCode(String),
    #[error("itinerary has no legs")]
    EmptyItinerary,
    #[error("leg {leg} departs from and arrives at {airport}")]
    CircularLeg { leg: usize, airport: IataCode },
    #[error("leg {leg} is scheduled to arrive before it departs")]
    ArrivalNotAfterDeparture { leg: usize },
    #[error("leg {leg} departs from {found} but the previous leg arrives at {expected}")]
    DiscontiguousLegs {
        leg: usize,
        expected: IataCode,
        found: IataCode,
    },
    #[error("affected leg index {index} is out of range for an itinerary of {legs} leg(s)")]
    AffectedLegOutOfRange { index: usize, legs: usize },
    #[error("delayed disruption has neither an actual arrival time nor the never-arrived marker")]
    MissingActualArrival,
}
