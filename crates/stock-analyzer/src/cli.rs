use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Score a single ticker from a pre-fetched analysis request.
///
/// The request is a JSON document with `symbol`, optional `profile`, `info`
/// (fundamentals), `history_long` and `history_short` price series.
#[derive(Debug, Parser)]
#[command(name = "stock-analyzer", author, version, about)]
pub struct Cli {
    /// Path to the analysis request JSON
    pub request: PathBuf,

    /// JSON scoring config overriding the default weights and thresholds
    #[arg(long, env = "STOCK_ANALYZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Include indicator series for charting in the report
    #[arg(long, default_value_t = false)]
    pub charts: bool,

    /// Print what each metric measures before the table
    #[arg(long, default_value_t = false)]
    pub explain: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Header, contribution table and recommendations.
    Table,
    /// The full report as one JSON object.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["stock-analyzer", "aapl.json"]).unwrap();
        assert_eq!(cli.request, PathBuf::from("aapl.json"));
        assert_eq!(cli.format, OutputFormat::Table);
        assert!(!cli.pretty && !cli.charts && !cli.explain);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "stock-analyzer",
            "msft.json",
            "--format",
            "json",
            "--pretty",
            "--charts",
            "--config",
            "weights.json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.pretty && cli.charts);
        assert_eq!(cli.config, Some(PathBuf::from("weights.json")));
    }

    #[test]
    fn test_request_is_required() {
        assert!(Cli::try_parse_from(["stock-analyzer"]).is_err());
    }
}
