use std::path::PathBuf;

use clap::{ArgAction, Parser};

use rusty_eda::analysis::DEFAULT_IQR_MULTIPLIER;
use rusty_eda::config::{AnalysisConfig, DEFAULT_DATE_COLUMN, DEFAULT_HEAD_ROWS};

#[derive(Parser, Debug)]
#[command(
    name = "rusty-eda",
    version,
    about = "Summarise a tabular file and plot boxplots of columns with IQR outliers"
)]
pub struct Cli {
    /// Data file (.csv, .tsv, .json, .jsonl, .xls/.xlsx/.ods, .parquet).
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Fence distance beyond the quartiles, in IQRs.
    #[arg(long, value_name = "K", default_value_t = DEFAULT_IQR_MULTIPLIER)]
    pub iqr_multiplier: f64,

    /// Column whose date range is reported when present.
    #[arg(long, value_name = "NAME", default_value = DEFAULT_DATE_COLUMN)]
    pub date_column: String,

    /// Rows shown in the dataset preview.
    #[arg(long = "head", value_name = "N", default_value_t = DEFAULT_HEAD_ROWS)]
    pub head_rows: usize,

    /// Print the boxplot summary as text instead of opening a window.
    #[arg(long)]
    pub no_gui: bool,

    /// Also print the outlier report as JSON.
    #[arg(long)]
    pub json: bool,

    /// More log output (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn config(&self) -> AnalysisConfig {
        AnalysisConfig {
            iqr_multiplier: self.iqr_multiplier,
            date_column: self.date_column.clone(),
            head_rows: self.head_rows,
        }
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_analysis_config() {
        let cli = Cli::parse_from(["rusty-eda", "data.csv"]);
        assert_eq!(cli.config(), AnalysisConfig::default());
        assert_eq!(cli.log_filter(), "warn");
        assert!(!cli.no_gui && !cli.json);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "rusty-eda",
            "data.tsv",
            "--iqr-multiplier",
            "3",
            "--date-column",
            "ts",
            "--head",
            "10",
            "--no-gui",
            "-vv",
        ]);
        let config = cli.config();
        assert_eq!(config.iqr_multiplier, 3.0);
        assert_eq!(config.date_column, "ts");
        assert_eq!(config.head_rows, 10);
        assert!(cli.no_gui);
        assert_eq!(cli.log_filter(), "debug");
    }
}
