//! Combines distance band, disruption assessment and mitigations into a verdict.

mod config;
mod policy;

pub use config::{CompensationConfig, CompensationConfigError};

use super::distance::DistanceClassification;
use super::domain::{DisruptionAssessment, EligibilityVerdict, MitigationFlags, Money};
use policy::{decide, Payout};

/// Stateless resolver applying the configured amount table.
#[derive(Debug, Clone)]
pub struct CompensationResolver {
    config: CompensationConfig,
}

impl CompensationResolver {
    pub fn new(config: CompensationConfig) -> Result<Self, CompensationConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CompensationConfig {
        &self.config
    }

    pub fn resolve(
        &self,
        classification: DistanceClassification,
        assessment: &DisruptionAssessment,
        mitigations: &MitigationFlags,
    ) -> EligibilityVerdict {
        let decision = decide(assessment, mitigations, &self.config);
        let full_amount = self.config.full_amount(classification.band);

        let amount = match decision.payout {
            Payout::Full => full_amount,
            // Odd amounts round in the passenger's favour.
            Payout::Half => full_amount.map(|amount| amount.div_ceil(2)),
            Payout::Nothing => None,
        }
        .map(|amount| Money {
            amount,
            currency: self.config.currency.clone(),
        });

        EligibilityVerdict {
            kind: decision.kind,
            amount,
            distance_band: classification.band,
            distance_km: classification.distance_km,
            arrival_delay_minutes: assessment.arrival_delay_minutes,
            reason: decision.reason,
        }
    }
}
