use crate::config::Dimensions;
use crate::config::{MAX_DIMENSION, MIN_DIMENSION};
use crate::core::ConfigProvider;
use crate::utils::error::{ChartError, Result};
use crate::utils::validation::{
    validate_csv_source, validate_non_empty_string, validate_path, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub layout: Dimensions,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Directory local CSV paths are resolved against.
    pub input_dir: Option<String>,
    pub box_plot: String,
    pub grouped_bar: String,
    pub line_chart: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub archive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub log_level: Option<String>,
    /// "compact" (default) or "json"
    pub log_format: Option<String>,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["compact", "json"];

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ChartError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ChartError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            ChartError::ConfigError {
                message: format!("invalid env pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("pipeline.name", &self.pipeline.name)?;

        validate_csv_source("source.box_plot", &self.source.box_plot)?;
        validate_csv_source("source.grouped_bar", &self.source.grouped_bar)?;
        validate_csv_source("source.line_chart", &self.source.line_chart)?;
        if let Some(dir) = &self.source.input_dir {
            validate_path("source.input_dir", dir)?;
        }

        validate_range("layout.width", self.layout.width, MIN_DIMENSION, MAX_DIMENSION)?;
        validate_range("layout.height", self.layout.height, MIN_DIMENSION, MAX_DIMENSION)?;

        validate_path("load.output_path", &self.load.output_path)?;

        if let Some(monitoring) = &self.monitoring {
            if let Some(level) = &monitoring.log_level {
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(ChartError::InvalidConfigValueError {
                        field: "monitoring.log_level".to_string(),
                        value: level.clone(),
                        reason: format!("Valid levels: {}", LOG_LEVELS.join(", ")),
                    });
                }
            }
            if let Some(format) = &monitoring.log_format {
                if !LOG_FORMATS.contains(&format.as_str()) {
                    return Err(ChartError::InvalidConfigValueError {
                        field: "monitoring.log_format".to_string(),
                        value: format.clone(),
                        reason: format!("Valid formats: {}", LOG_FORMATS.join(", ")),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn input_dir(&self) -> &str {
        self.source.input_dir.as_deref().unwrap_or(".")
    }

    pub fn log_level(&self) -> &str {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            == Some("json")
    }
}

impl ConfigProvider for TomlConfig {
    fn pipeline_name(&self) -> &str {
        &self.pipeline.name
    }

    fn box_plot_source(&self) -> &str {
        &self.source.box_plot
    }

    fn grouped_bar_source(&self) -> &str {
        &self.source.grouped_bar
    }

    fn line_chart_source(&self) -> &str {
        &self.source.line_chart
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn chart_width(&self) -> u32 {
        self.layout.width
    }

    fn chart_height(&self) -> u32 {
        self.layout.height
    }

    fn archive(&self) -> bool {
        self.load.archive.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
