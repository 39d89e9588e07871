use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "callwave",
    version,
    about = "Retry-wave projection and billing for outbound campaigns"
)]
pub(crate) struct Cli {
    /// trace, debug, info, warn or error; RUST_LOG wins when set
    #[clap(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Pretty-print JSON output
    #[clap(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Project conversions across retry waves
    Project {
        #[clap(long)]
        total_calls: u64,
        /// Fraction in (0, 1] or percentage in (1, 100]
        #[clap(long)]
        pickup_rate: f64,
        #[clap(long)]
        retries: u32,
        /// Minutes between waves, for the time span metric
        #[clap(long)]
        interval: Option<u32>,
        /// Average talk time per converted call, for the talk time metric
        #[clap(long)]
        talk_time: Option<f64>,
    },

    /// Aggregate a JSON array of call records ("-" reads stdin)
    Aggregate {
        records: PathBuf,
        /// Also break totals down per day in this IANA zone
        #[clap(long)]
        by_day: Option<String>,
    },

    /// Compute usage and channel charges
    Bill {
        #[clap(long)]
        seconds: f64,
        #[clap(long)]
        channels: u32,
        /// Rate schedule JSON; product defaults when omitted
        #[clap(long)]
        rates: Option<PathBuf>,
    },

    /// Validate a retry policy JSON file and print its submission envelope
    ValidatePolicy { policy: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_project() {
        let cli = Cli::try_parse_from([
            "callwave",
            "project",
            "--total-calls",
            "1000",
            "--pickup-rate",
            "60",
            "--retries",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "warn");
        match cli.command {
            Command::Project {
                total_calls,
                pickup_rate,
                retries,
                interval,
                ..
            } => {
                assert_eq!(total_calls, 1000);
                assert_eq!(pickup_rate, 60.0);
                assert_eq!(retries, 3);
                assert_eq!(interval, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_bill_with_global_flags() {
        let cli = Cli::try_parse_from([
            "callwave",
            "bill",
            "--seconds",
            "10000",
            "--channels",
            "5",
            "--pretty",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert!(cli.pretty);
        assert_eq!(cli.log_level, "debug");
        assert!(matches!(cli.command, Command::Bill { rates: None, .. }));
    }

    #[test]
    fn test_missing_required_arg_fails() {
        assert!(Cli::try_parse_from(["callwave", "project", "--total-calls", "5"]).is_err());
    }
}
