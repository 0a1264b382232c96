use super::super::domain::{
    DisruptionAssessment, DisruptionCategory, MitigationFlags, ReasonCode, VerdictKind,
};
use super::config::CompensationConfig;

/// Share of the band amount a decision pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Payout {
    Full,
    Half,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Decision {
    pub kind: VerdictKind,
    pub reason: ReasonCode,
    pub payout: Payout,
}

impl Decision {
    fn eligible(reason: ReasonCode, payout: Payout) -> Self {
        Self {
            kind: VerdictKind::Eligible,
            reason,
            payout,
        }
    }

    fn not_eligible(reason: ReasonCode) -> Self {
        Self {
            kind: VerdictKind::NotEligible,
            reason,
            payout: Payout::Nothing,
        }
    }

    fn uncertain(reason: ReasonCode) -> Self {
        Self {
            kind: VerdictKind::Uncertain,
            reason,
            payout: Payout::Nothing,
        }
    }
}

pub(crate) fn decide(
    assessment: &DisruptionAssessment,
    mitigations: &MitigationFlags,
    config: &CompensationConfig,
) -> Decision {
    // Checked before any category branch so no amount is ever computed for it.
    if mitigations.extraordinary_circumstances {
        return Decision::not_eligible(ReasonCode::ExtraordinaryCircumstances);
    }

    if assessment.ambiguity.is_some() {
        return Decision::uncertain(ReasonCode::AmbiguousArrivalData);
    }

    match assessment.category {
        DisruptionCategory::Delay => match assessment.arrival_delay_minutes {
            Some(minutes) if minutes >= config.delay_threshold_minutes => {
                Decision::eligible(ReasonCode::DelayThresholdMet, Payout::Full)
            }
            Some(_) => Decision::not_eligible(ReasonCode::DelayBelowThreshold),
            None => Decision::uncertain(ReasonCode::AmbiguousArrivalData),
        },
        DisruptionCategory::DelayUnresolved => Decision::uncertain(ReasonCode::DelayUnresolved),
        DisruptionCategory::Cancellation => {
            let notice_days = assessment.notice_days.unwrap_or(0);
            if notice_days >= config.notice_threshold_days {
                return Decision::not_eligible(ReasonCode::CancellationSufficientNotice);
            }

            match mitigations.reroute_arrival_delay_minutes {
                Some(minutes) if minutes < config.reroute_threshold_minutes => {
                    Decision::eligible(ReasonCode::CancellationRerouteMitigated, Payout::Half)
                }
                _ => Decision::eligible(ReasonCode::CancellationShortNotice, Payout::Full),
            }
        }
        DisruptionCategory::DeniedBoarding => {
            if assessment.volunteered {
                Decision::not_eligible(ReasonCode::DeniedBoardingVoluntary)
            } else {
                Decision::eligible(ReasonCode::DeniedBoardingInvoluntary, Payout::Full)
            }
        }
    }
}
