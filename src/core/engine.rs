use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Runs a pipeline's stages in order: extract, transform, load.
pub struct ChartEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ChartEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting chart generation");

        // Extract
        let stage = Instant::now();
        let data = self.pipeline.extract().await?;
        tracing::info!(
            "Loaded {} likes, {} averages, {} timeline rows in {:?}",
            data.likes.len(),
            data.averages.len(),
            data.timeline.len(),
            stage.elapsed()
        );

        // Transform
        let stage = Instant::now();
        let result = self.pipeline.transform(data).await?;
        tracing::info!(
            "Summarized {} groups and rendered {} files in {:?}",
            result.summaries.len(),
            result.files.len(),
            stage.elapsed()
        );

        // Load
        let stage = Instant::now();
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Wrote output to {} in {:?}", output_path, stage.elapsed());

        tracing::info!("Chart generation finished in {:?}", started.elapsed());
        Ok(output_path)
    }
}
