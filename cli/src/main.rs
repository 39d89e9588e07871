use callwave_core_rs::billing::{group_by_day, parse_records};
use callwave_core_rs::policy::{advisories, parse_timezone, SubmissionError};
use callwave_core_rs::{
    aggregate, bill, CampaignProjectionInput, PolicySubmission, ProjectionSummary, RetryPolicy,
    UsageRateSchedule,
};
use clap::Parser;
use cli::{Cli, Command};
use error::CliError;
use serde::Serialize;
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

mod cli;
mod error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = cli.log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::WARN);
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();

    ExitCode::from(exit_status(run(cli)))
}

/// Log a failed run and map it to the process exit status
fn exit_status(result: Result<(), CliError>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(CliError::Submission(SubmissionError::Invalid(errors))) => {
            for e in &errors {
                error!("{}", e);
            }
            1
        }
        Err(e) => {
            error!("{}", e);
            1
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let pretty = cli.pretty;
    match cli.command {
        Command::Project {
            total_calls,
            pickup_rate,
            retries,
            interval,
            talk_time,
        } => {
            let input = CampaignProjectionInput::from_form(total_calls, pickup_rate, retries);
            let waves = input.try_project()?;
            let summary = ProjectionSummary::from_waves(&waves, interval, talk_time);
            info!(waves = waves.len(), "projection complete");
            emit(&json!({ "waves": waves, "summary": summary }), pretty)
        }
        Command::Aggregate { records, by_day } => {
            let zone = by_day
                .map(|name| parse_timezone(&name).ok_or(CliError::Timezone(name)))
                .transpose()?;
            let text = read_input(&records)?;
            let records_set = parse_records(&text).map_err(|source| CliError::Json {
                path: records.clone(),
                source,
            })?;
            let stats = aggregate(&records_set);
            let mut output = json!({ "stats": stats, "pickupRate": stats.pickup_rate() });
            if let Some(tz) = zone {
                output["byDay"] = serde_json::to_value(group_by_day(&records_set, tz))?;
            }
            emit(&output, pretty)
        }
        Command::Bill {
            seconds,
            channels,
            rates,
        } => {
            let schedule = match rates {
                Some(path) => UsageRateSchedule::from_json_str(&read_input(&path)?)?,
                None => UsageRateSchedule::default(),
            };
            let summary = bill(seconds, channels, &schedule);
            emit(
                &json!({ "summary": summary, "display": summary.rounded(2) }),
                pretty,
            )
        }
        Command::ValidatePolicy { policy } => {
            let text = read_input(&policy)?;
            let parsed: RetryPolicy =
                serde_json::from_str(&text).map_err(|source| CliError::Json {
                    path: policy.clone(),
                    source,
                })?;
            let submission = PolicySubmission::prepare(&parsed)?;
            emit(
                &json!({ "submission": submission, "advisories": advisories(&parsed) }),
                pretty,
            )
        }
    }
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let to_err = |source| CliError::Read {
        path: PathBuf::from(path),
        source,
    };
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(to_err)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).map_err(to_err)
    }
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use callwave_core_rs::ValidationError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".json").expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write json");
        file
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("callwave").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_by_day_rejects_unknown_timezone() {
        let records = json_file(r#"[{"status": "completed", "durationSeconds": 60}]"#);
        let path = records.path().to_str().unwrap();

        let result = run(parse(&["aggregate", path, "--by-day", "Mars/Base"]));
        match result {
            Err(CliError::Timezone(zone)) => assert_eq!(zone, "Mars/Base"),
            other => panic!("expected timezone error, got {:?}", other),
        }

        let result = run(parse(&["aggregate", path, "--by-day", "Mars/Base"]));
        assert_eq!(exit_status(result), 1);
    }

    #[test]
    fn test_by_day_checks_zone_before_reading_records() {
        let result = run(parse(&[
            "aggregate",
            "/nonexistent/records.json",
            "--by-day",
            "Mars/Base",
        ]));
        assert!(matches!(result, Err(CliError::Timezone(_))));
    }

    #[test]
    fn test_aggregate_by_day_succeeds() {
        let records = json_file(
            r#"[{
                "status": "completed",
                "durationSeconds": 60,
                "startedAt": "2026-03-01T09:00:00Z"
            }]"#,
        );
        let path = records.path().to_str().unwrap();
        let result = run(parse(&["aggregate", path, "--by-day", "Asia/Tokyo"]));
        assert_eq!(exit_status(result), 0);
    }

    #[test]
    fn test_invalid_policy_fails() {
        let policy = json_file(r#"{"maxRetries": 11, "retryIntervalMinutes": 0}"#);
        let path = policy.path().to_str().unwrap();

        match run(parse(&["validate-policy", path])) {
            Err(CliError::Submission(SubmissionError::Invalid(errors))) => {
                assert_eq!(
                    errors,
                    vec![
                        ValidationError::MaxRetriesOutOfRange {
                            actual: 11,
                            max: 10
                        },
                        ValidationError::RetryIntervalTooShort { actual: 0, min: 1 },
                    ]
                );
            }
            other => panic!("expected invalid policy, got {:?}", other),
        }

        assert_eq!(exit_status(run(parse(&["validate-policy", path]))), 1);
    }

    #[test]
    fn test_valid_policy_succeeds() {
        let policy = json_file(r#"{"maxRetries": 3, "retryIntervalMinutes": 60}"#);
        let path = policy.path().to_str().unwrap();
        assert_eq!(exit_status(run(parse(&["validate-policy", path]))), 0);
    }

    #[test]
    fn test_policy_with_bad_json_fails() {
        let policy = json_file("{ not json");
        let path = policy.path().to_str().unwrap();
        let result = run(parse(&["validate-policy", path]));
        assert!(matches!(result, Err(CliError::Json { .. })));
        assert_eq!(exit_status(result), 1);
    }

    #[test]
    fn test_missing_rates_file_fails() {
        let result = run(parse(&[
            "bill",
            "--seconds",
            "100",
            "--channels",
            "3",
            "--rates",
            "/nonexistent/rates.json",
        ]));
        assert!(matches!(result, Err(CliError::Read { .. })));
    }

    #[test]
    fn test_projection_rejects_zero_calls() {
        let result = run(parse(&[
            "project",
            "--total-calls",
            "0",
            "--pickup-rate",
            "60",
            "--retries",
            "3",
        ]));
        assert!(matches!(result, Err(CliError::Projection(_))));
    }
}
