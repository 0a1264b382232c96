use chrono::{DateTime, Utc};
use tracing::debug;

use super::domain::{
    ActualArrival, AmbiguousDelay, DisruptionAssessment, DisruptionCategory, DisruptionKind,
    DisruptionRecord,
};
use super::error::InvalidRecordError;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_MINUTE: i64 = 60;

/// Derives the disruption category and timing facts from a record.
///
/// Arrival delay is always measured door-to-door: the last leg's scheduled arrival against the
/// passenger's actual arrival at the final destination, whichever leg was affected.
pub fn evaluate(record: &DisruptionRecord) -> Result<DisruptionAssessment, InvalidRecordError> {
    let itinerary = &record.itinerary;
    let affected_leg = itinerary.leg(record.affected_leg_index).ok_or(
        InvalidRecordError::AffectedLegOutOfRange {
            index: record.affected_leg_index,
            legs: itinerary.legs().len(),
        },
    )?;

    let assessment = match record.kind {
        DisruptionKind::Cancelled => {
            // Missing notice counts as no notice at all.
            let notice_days = record
                .notice_given_at
                .map(|given| whole_days_between(given, affected_leg.scheduled_departure))
                .unwrap_or(0);

            DisruptionAssessment {
                category: DisruptionCategory::Cancellation,
                arrival_delay_minutes: None,
                notice_days: Some(notice_days),
                volunteered: false,
                ambiguity: None,
            }
        }
        DisruptionKind::Delayed => {
            let arrival = record
                .actual_arrival
                .ok_or(InvalidRecordError::MissingActualArrival)?;
            match arrival {
                ActualArrival::NeverArrived => DisruptionAssessment {
                    category: DisruptionCategory::DelayUnresolved,
                    arrival_delay_minutes: None,
                    notice_days: None,
                    volunteered: false,
                    ambiguity: None,
                },
                ActualArrival::Arrived(at) if at < itinerary.first_leg().scheduled_departure => {
                    DisruptionAssessment {
                        category: DisruptionCategory::Delay,
                        arrival_delay_minutes: None,
                        notice_days: None,
                        volunteered: false,
                        ambiguity: Some(AmbiguousDelay::ArrivalBeforeDeparture),
                    }
                }
                ActualArrival::Arrived(at) => DisruptionAssessment {
                    category: DisruptionCategory::Delay,
                    arrival_delay_minutes: Some(whole_minutes_between(
                        itinerary.scheduled_arrival(),
                        at,
                    )),
                    notice_days: None,
                    volunteered: false,
                    ambiguity: None,
                },
            }
        }
        DisruptionKind::DeniedBoarding => DisruptionAssessment {
            category: DisruptionCategory::DeniedBoarding,
            arrival_delay_minutes: None,
            notice_days: None,
            volunteered: record.volunteered,
            ambiguity: None,
        },
    };

    debug!(
        category = ?assessment.category,
        arrival_delay_minutes = ?assessment.arrival_delay_minutes,
        notice_days = ?assessment.notice_days,
        affected_leg = record.affected_leg_index,
        "disruption assessed"
    );

    Ok(assessment)
}

fn whole_days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

fn whole_minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_seconds().div_euclid(SECONDS_PER_MINUTE)
}
