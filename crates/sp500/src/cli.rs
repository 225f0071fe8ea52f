use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing
    #[arg(long, value_enum, default_value_t = TraceLevel::WARN, global = true)]
    pub trace: TraceLevel,

    /// Read the company list from a CSV export instead of Wikipedia
    #[arg(long, global = true)]
    pub table: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the GICS sectors of the S&P 500.
    Sectors,

    /// Display the companies of the selected sectors.
    Companies {
        #[command(flatten)]
        filter: SectorArgs,

        /// Write the displayed companies to this CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print an inline HTML download link for the CSV.
        #[arg(long)]
        link: bool,
    },

    /// Plot year-to-date closing prices.
    Plot {
        #[command(flatten)]
        filter: SectorArgs,

        /// Number of companies for plots.
        #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=10))]
        count: u8,

        /// OR choose a specific symbol.
        #[arg(long, short)]
        symbol: Option<String>,

        #[arg(long, default_value = "./plots")]
        out_dir: PathBuf,
    },

    /// Interactive session; the company list is fetched once and reused.
    Dashboard {
        #[arg(long, default_value = "./plots")]
        out_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct SectorArgs {
    /// Sector to include; repeat for several. Every sector when omitted.
    #[arg(long = "sector", short = 'S')]
    pub sectors: Vec<String>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum TraceLevel {
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plot_arguments_parse() {
        let cli = Cli::parse_from([
            "sp500",
            "plot",
            "-S",
            "Information Technology",
            "--sector",
            "Energy",
            "--count",
            "3",
            "--symbol",
            "aapl",
        ]);
        match cli.command {
            Commands::Plot {
                filter,
                count,
                symbol,
                out_dir,
            } => {
                assert_eq!(filter.sectors, ["Information Technology", "Energy"]);
                assert_eq!(count, 3);
                assert_eq!(symbol.as_deref(), Some("aapl"));
                assert_eq!(out_dir, PathBuf::from("./plots"));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(cli.trace, TraceLevel::WARN);
    }

    #[test]
    fn count_outside_slider_bounds_is_rejected() {
        assert!(Cli::try_parse_from(["sp500", "plot", "--count", "0"]).is_err());
        assert!(Cli::try_parse_from(["sp500", "plot", "--count", "11"]).is_err());
    }

    #[test]
    fn trace_level_is_global() {
        let cli = Cli::parse_from(["sp500", "sectors", "--trace", "debug"]);
        assert_eq!(cli.trace, TraceLevel::DEBUG);
    }
}
