use crate::infra::build_engine;
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use clap::Args;
use flight_claim::config::{AppConfig, EligibilitySettings};
use flight_claim::error::AppError;
use flight_claim::workflows::eligibility::precheck::precheck;
use flight_claim::workflows::eligibility::{
    ActualArrival, DisruptionRecord, EligibilityEngine, EligibilityError, EligibilityVerdict,
    EvaluationRequest, FlightLeg, IataCode, Itinerary, MitigationFlags, PrecheckRequest,
    VerdictView,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding `{ "record": ..., "mitigations": ... }`
    #[arg(long)]
    pub(crate) record: PathBuf,
    /// Print the verdict as JSON instead of a text summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PrecheckArgs {
    /// Departure airport (IATA)
    #[arg(long, value_parser = crate::infra::parse_iata)]
    pub(crate) from: IataCode,
    /// Arrival airport (IATA)
    #[arg(long, value_parser = crate::infra::parse_iata)]
    pub(crate) to: IataCode,
    /// Travel date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: NaiveDate,
    #[arg(long)]
    pub(crate) flight_number: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date the scenario flights operate on (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: Option<NaiveDate>,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let engine = build_engine(&load_settings()?)?;
    let raw = std::fs::read_to_string(&args.record)?;
    let request: EvaluationRequest = serde_json::from_str(&raw)?;
    let verdict = engine.evaluate(&request.record, &request.mitigations)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&VerdictView::from(verdict))?);
    } else {
        print_verdict(&verdict);
    }
    Ok(())
}

pub(crate) fn run_precheck(args: PrecheckArgs) -> Result<(), AppError> {
    let settings = load_settings()?;
    let engine = build_engine(&settings)?;
    let request = PrecheckRequest {
        from: args.from,
        to: args.to,
        date: args.date,
        flight_number: args.flight_number,
    };
    let response = precheck(&engine, &settings.precheck, &request)?;

    println!("Precheck {} -> {} on {}", request.from, request.to, request.date);
    println!("  Eligible: {}", if response.eligible { "likely" } else { "unlikely" });
    println!("  Reason: {}", response.reason);
    if let Some(amount) = response.amount {
        println!("  Estimated amount: {amount}");
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = build_engine(&load_settings()?)?;
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());

    println!("=== Flight Claim Eligibility Demo ===");
    println!(
        "Airports loaded: {} | Currency: {}",
        engine.airports().len(),
        engine.config().currency
    );

    for scenario in demo_scenarios(date)? {
        println!();
        println!("[{}] {}", scenario.label, scenario.description);
        let verdict = engine.evaluate(&scenario.record, &scenario.mitigations)?;
        print_verdict(&verdict);
    }

    Ok(())
}

fn load_settings() -> Result<EligibilitySettings, AppError> {
    Ok(AppConfig::load()?.eligibility)
}

pub(crate) struct DemoScenario {
    pub(crate) label: &'static str,
    pub(crate) description: &'static str,
    pub(crate) record: DisruptionRecord,
    pub(crate) mitigations: MitigationFlags,
}

pub(crate) fn demo_scenarios(date: NaiveDate) -> Result<Vec<DemoScenario>, AppError> {
    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    let leg = |origin: &str, destination: &str, block_minutes: i64, flight: &str| {
        let departure = midnight + Duration::hours(10);
        Ok::<_, EligibilityError>(FlightLeg {
            origin: IataCode::parse(origin)?,
            destination: IataCode::parse(destination)?,
            scheduled_departure: departure,
            scheduled_arrival: departure + Duration::minutes(block_minutes),
            airline: flight.chars().take(2).collect(),
            flight_number: flight.to_string(),
        })
    };
    let direct = |leg: FlightLeg| Itinerary::direct(leg).map_err(EligibilityError::from);

    let transatlantic = direct(leg("CPH", "JFK", 510, "SK909")?)?;
    let scandinavian = direct(leg("CPH", "ARN", 70, "SK1417")?)?;
    let arrival_after = |minutes: i64| {
        ActualArrival::Arrived(transatlantic.scheduled_arrival() + Duration::minutes(minutes))
    };
    let (late, slightly_late) = (arrival_after(215), arrival_after(90));

    Ok(vec![
        DemoScenario {
            label: "A",
            description: "CPH -> JFK arrived 215 minutes late",
            record: DisruptionRecord::delayed(transatlantic.clone(), 0, late),
            mitigations: MitigationFlags::default(),
        },
        DemoScenario {
            label: "B",
            description: "CPH -> JFK arrived 90 minutes late",
            record: DisruptionRecord::delayed(transatlantic.clone(), 0, slightly_late),
            mitigations: MitigationFlags::default(),
        },
        DemoScenario {
            label: "C",
            description: "CPH -> ARN cancelled with 3 days notice, rerouted 45 minutes late",
            record: DisruptionRecord::cancelled(
                scandinavian.clone(),
                0,
                Some(scandinavian.first_leg().scheduled_departure - Duration::days(3)),
            ),
            mitigations: MitigationFlags {
                extraordinary_circumstances: false,
                reroute_arrival_delay_minutes: Some(45),
            },
        },
        DemoScenario {
            label: "D",
            description: "CPH -> ARN boarding denied after volunteering",
            record: DisruptionRecord::denied_boarding(scandinavian, 0, true),
            mitigations: MitigationFlags::default(),
        },
        DemoScenario {
            label: "E",
            description: "CPH -> JFK never arrived",
            record: DisruptionRecord::delayed(transatlantic, 0, ActualArrival::NeverArrived),
            mitigations: MitigationFlags::default(),
        },
    ])
}

fn print_verdict(verdict: &EligibilityVerdict) {
    println!(
        "  Verdict: {} ({})",
        verdict.kind.label(),
        verdict.reason.tag()
    );
    println!(
        "  Distance: {:.0} km, {} band",
        verdict.distance_km,
        verdict.distance_band.label()
    );
    if let Some(minutes) = verdict.arrival_delay_minutes {
        println!("  Arrival delay: {minutes} min");
    }
    match &verdict.amount {
        Some(amount) => println!("  Amount: {amount}"),
        None => println!("  Amount: n/a"),
    }
    println!("  Message: {}", verdict.customer_message());
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_claim::workflows::eligibility::{DistanceBand, ReasonCode, VerdictKind};

    fn run_scenarios() -> Vec<(&'static str, EligibilityVerdict)> {
        let engine = build_engine(&EligibilitySettings::default()).expect("engine builds");
        let date = NaiveDate::from_ymd_opt(2025, 6, 15).expect("valid date");
        demo_scenarios(date)
            .expect("scenarios build")
            .into_iter()
            .map(|scenario| {
                let verdict = engine
                    .evaluate(&scenario.record, &scenario.mitigations)
                    .expect("scenario evaluates");
                (scenario.label, verdict)
            })
            .collect()
    }

    #[test]
    fn demo_scenarios_produce_documented_verdicts() {
        let results = run_scenarios();
        let labels: Vec<_> = results.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, ["A", "B", "C", "D", "E"]);

        let (_, a) = &results[0];
        assert_eq!(a.kind, VerdictKind::Eligible);
        assert_eq!(a.distance_band, DistanceBand::Long);
        assert_eq!(a.amount.as_ref().map(|money| money.amount), Some(600));

        let (_, b) = &results[1];
        assert_eq!(b.kind, VerdictKind::NotEligible);

        let (_, c) = &results[2];
        assert_eq!(c.kind, VerdictKind::Eligible);
        assert_eq!(c.distance_band, DistanceBand::Short);
        assert_eq!(c.amount.as_ref().map(|money| money.amount), Some(125));

        let (_, d) = &results[3];
        assert_eq!(d.kind, VerdictKind::NotEligible);
        assert_eq!(d.reason, ReasonCode::DeniedBoardingVoluntary);

        let (_, e) = &results[4];
        assert_eq!(e.kind, VerdictKind::Uncertain);
        assert!(e.amount.is_none());
    }
}
