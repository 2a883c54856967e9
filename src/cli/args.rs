//! CLI argument definitions using clap derive

use clap::Parser;
use std::path::PathBuf;

use crate::core::Destination;

#[derive(Parser, Debug)]
#[command(name = "reck")]
#[command(author, version, about = "Submit QA csv/excel report files to the EG database and query them back")]
#[command(long_about = "Submit QA test-report files (CSV or Excel) to one of two report \
collections, or query stored reports with composable filters. Every invocation performs \
exactly one operation: an upload (--send) or one retrieval.")]
pub struct Cli {
    /// Target the local report collection
    #[arg(short = 'l', long, conflicts_with = "mega")]
    pub local: bool,

    /// Target the mega report collection
    #[arg(short = 'm', long)]
    pub mega: bool,

    /// Upload a report file to the chosen collection
    #[arg(
        short = 's',
        long,
        value_name = "FILE",
        conflicts_with_all = ["all", "special", "blocker", "build", "repeatable", "user", "csv"]
    )]
    pub send: Option<PathBuf>,

    /// Return all stored reports (overrides every filter)
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Return the first, middle, and last stored report
    #[arg(short = 'p', long)]
    pub special: bool,

    /// Only reports marked as blockers
    #[arg(short = 'b', long)]
    pub blocker: bool,

    /// Only reports for this build date
    #[arg(short = 'd', long, value_name = "DATE")]
    pub build: Option<String>,

    /// Only reports marked repeatable
    #[arg(short = 'r', long)]
    pub repeatable: bool,

    /// Only reports owned by this tester (exact match)
    #[arg(short = 'u', long, value_name = "NAME")]
    pub user: Option<String>,

    /// Also save the query result to a timestamped CSV file
    #[arg(short = 'c', long)]
    pub csv: bool,

    /// Report store location (overrides config)
    #[arg(long, value_name = "PATH", env = "RECKONING_DB")]
    pub db: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// The chosen destination collection, if exactly one was selected.
    /// There is deliberately no default.
    pub fn destination(&self) -> Option<Destination> {
        match (self.local, self.mega) {
            (true, false) => Some(Destination::Local),
            (false, true) => Some(Destination::Mega),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_requires_exactly_one() {
        let cli = Cli::parse_from(["reck", "--local", "--all"]);
        assert_eq!(cli.destination(), Some(Destination::Local));

        let cli = Cli::parse_from(["reck", "--mega", "--all"]);
        assert_eq!(cli.destination(), Some(Destination::Mega));

        let cli = Cli::parse_from(["reck", "--all"]);
        assert_eq!(cli.destination(), None);
    }

    #[test]
    fn test_local_and_mega_conflict() {
        assert!(Cli::try_parse_from(["reck", "--local", "--mega"]).is_err());
    }

    #[test]
    fn test_send_conflicts_with_query_flags() {
        assert!(Cli::try_parse_from(["reck", "--local", "--send", "r.csv", "--all"]).is_err());
        assert!(Cli::try_parse_from(["reck", "--local", "--send", "r.csv", "--blocker"]).is_err());
        assert!(Cli::try_parse_from(["reck", "--local", "--send", "r.csv", "--csv"]).is_err());
        assert!(Cli::try_parse_from(["reck", "--local", "--send", "r.csv"]).is_ok());
    }

    #[test]
    fn test_filter_flags_parse() {
        let cli = Cli::parse_from([
            "reck", "--mega", "--blocker", "--repeatable", "--build", "2024-03-01", "--user",
            "sam",
        ]);
        assert!(cli.blocker);
        assert!(cli.repeatable);
        assert_eq!(cli.build.as_deref(), Some("2024-03-01"));
        assert_eq!(cli.user.as_deref(), Some("sam"));
    }
}
