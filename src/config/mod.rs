#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_csv_source, validate_path, validate_range, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 400;
pub const MIN_DIMENSION: u32 = 100;
pub const MAX_DIMENSION: u32 = 10_000;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "social-charts")]
#[command(about = "Render box plot, grouped bar and line charts from social media CSV data")]
pub struct CliConfig {
    /// CSV with Platform and Likes columns (path or http(s) URL)
    #[arg(long, default_value = "socialMedia.csv")]
    pub box_plot_csv: String,

    /// CSV with Platform, PostType and AvgLikes columns
    #[arg(long, default_value = "socialMediaAvg.csv")]
    pub grouped_bar_csv: String,

    /// CSV with Date and AvgLikes columns
    #[arg(long, default_value = "socialMediaTime.csv")]
    pub line_chart_csv: String,

    /// Directory local CSV paths are resolved against
    #[arg(long, default_value = ".")]
    pub input_dir: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Bundle every output into a single charts.zip
    #[arg(long)]
    pub archive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn pipeline_name(&self) -> &str {
        "social-charts"
    }

    fn box_plot_source(&self) -> &str {
        &self.box_plot_csv
    }

    fn grouped_bar_source(&self) -> &str {
        &self.grouped_bar_csv
    }

    fn line_chart_source(&self) -> &str {
        &self.line_chart_csv
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn chart_width(&self) -> u32 {
        self.width
    }

    fn chart_height(&self) -> u32 {
        self.height
    }

    fn archive(&self) -> bool {
        self.archive
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_csv_source("box_plot_csv", &self.box_plot_csv)?;
        validate_csv_source("grouped_bar_csv", &self.grouped_bar_csv)?;
        validate_csv_source("line_chart_csv", &self.line_chart_csv)?;
        validate_path("input_dir", &self.input_dir)?;
        validate_path("output_path", &self.output_path)?;
        validate_range("width", self.width, MIN_DIMENSION, MAX_DIMENSION)?;
        validate_range("height", self.height, MIN_DIMENSION, MAX_DIMENSION)?;
        Ok(())
    }
}

/// Chart size shared by both config front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["social-charts"]);
        assert_eq!(config.box_plot_source(), "socialMedia.csv");
        assert_eq!(config.grouped_bar_source(), "socialMediaAvg.csv");
        assert_eq!(config.line_chart_source(), "socialMediaTime.csv");
        assert_eq!((config.chart_width(), config.chart_height()), (800, 400));
        assert!(!config.archive());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_and_validation() {
        let config = CliConfig::parse_from([
            "social-charts",
            "--box-plot-csv",
            "https://example.com/socialMedia.csv",
            "--width",
            "1200",
            "--archive",
        ]);
        assert_eq!(config.chart_width(), 1200);
        assert!(config.archive());
        assert!(config.validate().is_ok());

        let bad = CliConfig::parse_from(["social-charts", "--height", "20"]);
        assert!(bad.validate().is_err());

        let bad = CliConfig::parse_from(["social-charts", "--line-chart-csv", "time.json"]);
        assert!(bad.validate().is_err());
    }
}
