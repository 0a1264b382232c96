use std::sync::Arc;

use tracing::debug;

use super::disruption;
use super::distance::{DistanceClassification, DistanceClassifier};
use super::domain::{DisruptionRecord, EligibilityVerdict, Itinerary, MitigationFlags};
use super::error::EligibilityError;
use super::resolver::{CompensationConfig, CompensationConfigError, CompensationResolver};
use crate::workflows::airports::AirportDirectory;

/// Pure pipeline: distance classifier, then disruption evaluator, then compensation resolver.
///
/// Holds only immutable state, so one instance can serve any number of concurrent callers.
#[derive(Debug, Clone)]
pub struct EligibilityEngine {
    airports: Arc<AirportDirectory>,
    classifier: DistanceClassifier,
    resolver: CompensationResolver,
}

impl EligibilityEngine {
    pub fn new(
        airports: Arc<AirportDirectory>,
        config: CompensationConfig,
    ) -> Result<Self, CompensationConfigError> {
        let classifier = DistanceClassifier::new(config.thresholds);
        let resolver = CompensationResolver::new(config)?;
        Ok(Self {
            airports,
            classifier,
            resolver,
        })
    }

    pub fn airports(&self) -> &AirportDirectory {
        &self.airports
    }

    pub fn config(&self) -> &CompensationConfig {
        self.resolver.config()
    }

    pub fn classifier(&self) -> &DistanceClassifier {
        &self.classifier
    }

    /// Journey distance from the first origin to the final destination, ignoring connections.
    pub fn classify_itinerary(
        &self,
        itinerary: &Itinerary,
    ) -> Result<DistanceClassification, EligibilityError> {
        let origin = self.airports.lookup(itinerary.origin())?;
        let destination = self.airports.lookup(itinerary.final_destination())?;
        Ok(self.classifier.measure(origin, destination))
    }

    pub fn evaluate(
        &self,
        record: &DisruptionRecord,
        mitigations: &MitigationFlags,
    ) -> Result<EligibilityVerdict, EligibilityError> {
        let classification = self.classify_itinerary(&record.itinerary)?;
        let assessment = disruption::evaluate(record)?;
        let verdict = self
            .resolver
            .resolve(classification, &assessment, mitigations);

        debug!(
            origin = %record.itinerary.origin(),
            destination = %record.itinerary.final_destination(),
            band = classification.band.label(),
            distance_km = classification.distance_km,
            verdict = verdict.kind.label(),
            reason = verdict.reason.tag(),
            "eligibility resolved"
        );

        Ok(verdict)
    }
}
