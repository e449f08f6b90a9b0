pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{cli::LocalStorage, CliConfig};

pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{engine::ChartEngine, pipeline::ChartPipeline, summarize::summarize};
pub use crate::domain::model::{FiveNumberSummary, GroupedSummaries, Record};
pub use crate::utils::error::{ChartError, Result};
