use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::distance::DistanceThresholds;
use super::super::domain::DistanceBand;

/// Amount table and rule thresholds handed to the resolver. Never read from the environment
/// inside the engine; callers build it explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationConfig {
    pub currency: String,
    pub amounts: BTreeMap<DistanceBand, u32>,
    pub thresholds: DistanceThresholds,
    pub delay_threshold_minutes: i64,
    pub notice_threshold_days: i64,
    pub reroute_threshold_minutes: i64,
}

impl Default for CompensationConfig {
    fn default() -> Self {
        let mut amounts = BTreeMap::new();
        amounts.insert(DistanceBand::Short, 250);
        amounts.insert(DistanceBand::Medium, 400);
        amounts.insert(DistanceBand::Long, 600);

        Self {
            currency: "EUR".to_string(),
            amounts,
            thresholds: DistanceThresholds::default(),
            delay_threshold_minutes: 180,
            notice_threshold_days: 14,
            reroute_threshold_minutes: 180,
        }
    }
}

impl CompensationConfig {
    pub fn validate(&self) -> Result<(), CompensationConfigError> {
        if self.currency.trim().is_empty() {
            return Err(CompensationConfigError::MissingCurrency);
        }

        if let Some(band) = DistanceBand::ALL
            .into_iter()
            .find(|band| !self.amounts.contains_key(band))
        {
            return Err(CompensationConfigError::MissingAmount(band));
        }

        let DistanceThresholds {
            short_max_km,
            medium_max_km,
        } = self.thresholds;
        if !(short_max_km > 0.0 && short_max_km < medium_max_km) {
            return Err(CompensationConfigError::ThresholdsOutOfOrder {
                short_max_km,
                medium_max_km,
            });
        }

        if self.delay_threshold_minutes <= 0
            || self.notice_threshold_days <= 0
            || self.reroute_threshold_minutes <= 0
        {
            return Err(CompensationConfigError::NonPositiveThreshold);
        }

        Ok(())
    }

    pub fn full_amount(&self, band: DistanceBand) -> Option<u32> {
        self.amounts.get(&band).copied()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompensationConfigError {
    #[error("compensation currency must not be empty")]
    MissingCurrency,
    #[error("no compensation amount configured for the {} band", .0.label())]
    MissingAmount(DistanceBand),
    #[error("distance thresholds must satisfy 0 < short ({short_max_km}) < medium ({medium_max_km})")]
    ThresholdsOutOfOrder {
        short_max_km: f64,
        medium_max_km: f64,
    },
    #[error("delay, notice and reroute thresholds must be positive")]
    NonPositiveThreshold,
}
