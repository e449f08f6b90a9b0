use crate::domain::model::{ChartData, RenderResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn pipeline_name(&self) -> &str;
    fn box_plot_source(&self) -> &str;
    fn grouped_bar_source(&self) -> &str;
    fn line_chart_source(&self) -> &str;
    fn output_path(&self) -> &str;
    fn chart_width(&self) -> u32;
    fn chart_height(&self) -> u32;
    fn archive(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ChartData>;
    async fn transform(&self, data: ChartData) -> Result<RenderResult>;
    async fn load(&self, result: RenderResult) -> Result<String>;
}
