//! Compensation eligibility for disrupted flights.
//!
//! Data flows one way: a [`DisruptionRecord`] is classified by journey distance, assessed for
//! disruption category and timing, and finally resolved against the configured amount table.
//! No stage calls back into an earlier one and none of them perform I/O.

pub mod disruption;
pub mod distance;
pub mod domain;
pub mod engine;
pub mod error;
pub mod precheck;
pub mod resolver;
pub mod router;
pub mod service;
pub mod verification;

#[cfg(test)]
mod tests;

pub use distance::{great_circle_km, DistanceClassification, DistanceClassifier, DistanceThresholds};
pub use domain::{
    ActualArrival, Airport, AmbiguousDelay, DisruptionAssessment, DisruptionCategory,
    DisruptionKind, DisruptionRecord, DistanceBand, EligibilityVerdict, FlightLeg, IataCode,
    Itinerary, MitigationFlags, Money, ReasonCode, VerdictKind,
};
pub use engine::EligibilityEngine;
pub use error::{EligibilityError, InvalidRecordError};
pub use precheck::{PrecheckConfig, PrecheckRequest, PrecheckResponse};
pub use resolver::{CompensationConfig, CompensationConfigError, CompensationResolver};
pub use router::eligibility_router;
pub use service::{
    Confidence, EligibilityService, EvaluationRequest, ServiceError, VerdictView,
    VerificationResponse,
};
pub use verification::{
    FlightDataProvider, FlightOutcome, FlightQuery, FlightStatus, MockFlightDataProvider,
    MockScenario, ProviderError,
};
