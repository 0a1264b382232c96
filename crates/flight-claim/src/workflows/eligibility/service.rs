use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    ActualArrival, DisruptionRecord, EligibilityVerdict, Itinerary, MitigationFlags, VerdictKind,
};
use super::engine::EligibilityEngine;
use super::error::EligibilityError;
use super::precheck::{precheck, PrecheckConfig, PrecheckRequest, PrecheckResponse};
use super::verification::{
    FlightDataProvider, FlightOutcome, FlightQuery, FlightStatus, ProviderError,
};

/// Full evaluation input accepted over HTTP and from the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub record: DisruptionRecord,
    #[serde(default)]
    pub mitigations: MitigationFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    pub matched: bool,
    pub arrival_delay_minutes: Option<i64>,
    pub cancelled: Option<bool>,
    pub confidence: Confidence,
    pub source: String,
}

/// Verdict plus the passenger-facing message, as returned by the evaluate endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct VerdictView {
    #[serde(flatten)]
    pub verdict: EligibilityVerdict,
    pub message: String,
}

impl From<EligibilityVerdict> for VerdictView {
    fn from(verdict: EligibilityVerdict) -> Self {
        let message = verdict.customer_message();
        Self { verdict, message }
    }
}

/// Facade composing the engine with the flight-data provider.
pub struct EligibilityService<P> {
    engine: Arc<EligibilityEngine>,
    provider: Arc<P>,
    precheck: PrecheckConfig,
}

impl<P> EligibilityService<P>
where
    P: FlightDataProvider + 'static,
{
    pub fn new(engine: Arc<EligibilityEngine>, provider: Arc<P>, precheck: PrecheckConfig) -> Self {
        Self {
            engine,
            provider,
            precheck,
        }
    }

    pub fn engine(&self) -> &EligibilityEngine {
        &self.engine
    }

    /// Evaluate a caller-supplied disruption record.
    pub fn evaluate(
        &self,
        request: &EvaluationRequest,
    ) -> Result<EligibilityVerdict, ServiceError> {
        let verdict = self.engine.evaluate(&request.record, &request.mitigations)?;
        log_verdict("evaluate", &verdict);
        Ok(verdict)
    }

    /// Resolve a flight through the provider and evaluate what it reports.
    pub fn verify(&self, query: &FlightQuery) -> Result<VerificationResponse, ServiceError> {
        let source = self.provider.source().to_string();
        let status = self.provider.lookup(query).map_err(|err| {
            warn!(flight = %query.flight_number, error = %err, "flight lookup failed");
            err
        })?;

        let Some(status) = status else {
            info!(flight = %query.flight_number, date = %query.date, "flight not matched");
            return Ok(VerificationResponse {
                matched: false,
                arrival_delay_minutes: None,
                cancelled: None,
                confidence: Confidence::Low,
                source,
            });
        };

        let cancelled = matches!(status.outcome, FlightOutcome::Cancelled { .. });
        let record = record_from_status(status)?;
        let verdict = self.engine.evaluate(&record, &MitigationFlags::default())?;
        log_verdict("verify", &verdict);

        let confidence = match verdict.kind {
            VerdictKind::Uncertain => Confidence::Medium,
            VerdictKind::Eligible | VerdictKind::NotEligible => Confidence::High,
        };

        Ok(VerificationResponse {
            matched: true,
            arrival_delay_minutes: verdict.arrival_delay_minutes,
            cancelled: Some(cancelled),
            confidence,
            source,
        })
    }

    pub fn precheck(&self, request: &PrecheckRequest) -> Result<PrecheckResponse, ServiceError> {
        let response = precheck(&self.engine, &self.precheck, request)?;
        info!(
            from = %request.from,
            to = %request.to,
            eligible = response.eligible,
            reason = %response.reason,
            "precheck estimated"
        );
        Ok(response)
    }
}

fn record_from_status(status: FlightStatus) -> Result<DisruptionRecord, EligibilityError> {
    let itinerary = Itinerary::direct(status.leg)?;
    let record = match status.outcome {
        FlightOutcome::Arrived { at } => {
            DisruptionRecord::delayed(itinerary, 0, ActualArrival::Arrived(at))
        }
        FlightOutcome::NeverArrived => {
            DisruptionRecord::delayed(itinerary, 0, ActualArrival::NeverArrived)
        }
        FlightOutcome::Cancelled { notice_given_at } => {
            DisruptionRecord::cancelled(itinerary, 0, notice_given_at)
        }
    };
    Ok(record)
}

fn log_verdict(operation: &'static str, verdict: &EligibilityVerdict) {
    info!(
        operation,
        verdict = verdict.kind.label(),
        reason = verdict.reason.tag(),
        band = verdict.distance_band.label(),
        "eligibility verdict issued"
    );
}

/// Error raised by the eligibility service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
