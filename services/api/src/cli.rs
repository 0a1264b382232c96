use crate::demo::{run_demo, run_evaluate, run_precheck, DemoArgs, EvaluateArgs, PrecheckArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use flight_claim::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Flight Claim Eligibility",
    about = "Evaluate flight disruptions for passenger compensation from the command line or over HTTP",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate a disruption record stored as JSON and print the verdict
    Evaluate(EvaluateArgs),
    /// Estimate eligibility from route and date only
    Precheck(PrecheckArgs),
    /// Run the canonical disruption scenarios against the configured engine
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args),
        Command::Precheck(args) => run_precheck(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_optional() {
        let cli = Cli::try_parse_from(["flight-claim-api"]).expect("parses without subcommand");
        assert!(cli.command.is_none());
    }

    #[test]
    fn evaluate_requires_record_path() {
        assert!(Cli::try_parse_from(["flight-claim-api", "evaluate"]).is_err());

        let cli = Cli::try_parse_from(["flight-claim-api", "evaluate", "--record", "claim.json"])
            .expect("parses evaluate");
        match cli.command {
            Some(Command::Evaluate(args)) => {
                assert_eq!(args.record.to_str(), Some("claim.json"));
                assert!(!args.json);
            }
            other => panic!("expected evaluate command, got {other:?}"),
        }
    }

    #[test]
    fn precheck_validates_codes_and_date() {
        let cli = Cli::try_parse_from([
            "flight-claim-api",
            "precheck",
            "--from",
            "cph",
            "--to",
            "ARN",
            "--date",
            "2025-06-15",
        ])
        .expect("parses precheck");
        match cli.command {
            Some(Command::Precheck(args)) => {
                assert_eq!(args.from.as_str(), "CPH");
                assert!(args.flight_number.is_none());
            }
            other => panic!("expected precheck command, got {other:?}"),
        }

        assert!(Cli::try_parse_from([
            "flight-claim-api",
            "precheck",
            "--from",
            "CPHX",
            "--to",
            "ARN",
            "--date",
            "2025-06-15",
        ])
        .is_err());
    }
}
