pub mod engine;
pub mod loader;
pub mod pipeline;
pub mod summarize;

pub use crate::domain::model::{ChartData, RenderResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
