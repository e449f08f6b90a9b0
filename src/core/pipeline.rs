use crate::core::loader::{parse_averages, parse_likes, parse_timeline, source_name};
use crate::core::summarize::{global_max, summarize};
use crate::core::{ChartData, ConfigProvider, Pipeline, RenderResult, Storage};
use crate::domain::model::{GroupedSummaries, RenderedFile};
use crate::render::{box_plot, grouped_bar_chart, line_chart, Layout};
use crate::utils::error::{ChartError, Result};
use crate::utils::validation::is_remote_source;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::io::Write;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const BOX_PLOT_FILE: &str = "box_plot.svg";
pub const GROUPED_BAR_FILE: &str = "grouped_bar.svg";
pub const LINE_CHART_FILE: &str = "line_chart.svg";
pub const HTML_FILE: &str = "charts.html";
pub const SUMMARIES_FILE: &str = "summaries.json";
pub const ARCHIVE_FILE: &str = "charts.zip";

#[derive(Serialize)]
struct SummaryReport<'a> {
    pipeline: &'a str,
    generated_at: DateTime<Utc>,
    record_count: usize,
    value_axis_max: f64,
    groups: &'a GroupedSummaries,
}

/// Loads the three datasets, renders the charts and writes them out.
///
/// `input` resolves local source paths, `output` receives the rendered files.
pub struct ChartPipeline<S: Storage, C: ConfigProvider> {
    input: S,
    output: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> ChartPipeline<S, C> {
    pub fn new(input: S, output: S, config: C) -> Self {
        Self {
            input,
            output,
            config,
            client: Client::new(),
        }
    }

    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if is_remote_source(location) {
            tracing::debug!("Fetching {} over HTTP", location);
            let response = self.client.get(location).send().await?;
            let status = response.status();
            tracing::debug!("HTTP response status: {}", status);

            if !status.is_success() {
                return Err(ChartError::HttpStatusError {
                    url: location.to_string(),
                    status: status.as_u16(),
                });
            }
            Ok(response.bytes().await?.to_vec())
        } else {
            tracing::debug!("Reading {} from storage", location);
            self.input.read_file(location).await
        }
    }

    fn render_html(&self, charts: &[(&str, &str)]) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n",
        );
        html.push_str(&format!(
            "<title>{}</title>\n</head>\n<body>\n",
            crate::render::svg::escape_xml(self.config.pipeline_name())
        ));
        for (i, (title, svg)) in charts.iter().enumerate() {
            html.push_str(&format!(
                "<h2>{}</h2>\n<div id=\"chart{}\">\n{}</div>\n",
                title,
                i + 1,
                svg
            ));
        }
        html.push_str("</body>\n</html>\n");
        html
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ChartPipeline<S, C> {
    async fn extract(&self) -> Result<ChartData> {
        let box_plot_source = self.config.box_plot_source();
        let likes = parse_likes(
            &source_name(box_plot_source),
            &self.fetch(box_plot_source).await?,
        )?;

        let grouped_bar_source = self.config.grouped_bar_source();
        let averages = parse_averages(
            &source_name(grouped_bar_source),
            &self.fetch(grouped_bar_source).await?,
        )?;

        let line_chart_source = self.config.line_chart_source();
        let timeline = parse_timeline(
            &source_name(line_chart_source),
            &self.fetch(line_chart_source).await?,
        )?;

        if likes.is_empty() {
            tracing::warn!("{} has no rows, the box plot will be empty", box_plot_source);
        }

        Ok(ChartData {
            likes,
            averages,
            timeline,
        })
    }

    async fn transform(&self, data: ChartData) -> Result<RenderResult> {
        let summaries = summarize(Some(data.likes.as_slice()))?;
        for (group, s) in summaries.iter() {
            tracing::debug!(
                "{}: min={} q1={} median={} q3={} max={}",
                group,
                s.min,
                s.q1,
                s.median,
                s.q3,
                s.max
            );
        }

        let (width, height) = (self.config.chart_width(), self.config.chart_height());
        let box_svg =
            box_plot(&data.likes, &summaries, &Layout::box_plot(width, height)).to_svg_string();
        let bar_svg = grouped_bar_chart(&data.averages, &Layout::standard(width, height))
            .to_svg_string();
        let line_svg = line_chart(&data.timeline, &Layout::standard(width, height)).to_svg_string();

        let html = self.render_html(&[
            ("Likes by Platform", box_svg.as_str()),
            ("Average Likes by Platform and Post Type", bar_svg.as_str()),
            ("Average Likes over Time", line_svg.as_str()),
        ]);

        let report = SummaryReport {
            pipeline: self.config.pipeline_name(),
            generated_at: Utc::now(),
            record_count: data.likes.len(),
            value_axis_max: global_max(data.likes.iter().map(|r| r.value)).unwrap_or(0.0),
            groups: &summaries,
        };
        let summaries_json = serde_json::to_string_pretty(&report)?;

        let files = vec![
            RenderedFile {
                name: BOX_PLOT_FILE.to_string(),
                contents: box_svg,
            },
            RenderedFile {
                name: GROUPED_BAR_FILE.to_string(),
                contents: bar_svg,
            },
            RenderedFile {
                name: LINE_CHART_FILE.to_string(),
                contents: line_svg,
            },
            RenderedFile {
                name: HTML_FILE.to_string(),
                contents: html,
            },
            RenderedFile {
                name: SUMMARIES_FILE.to_string(),
                contents: summaries_json,
            },
        ];

        Ok(RenderResult { summaries, files })
    }

    async fn load(&self, result: RenderResult) -> Result<String> {
        let output_path = self.config.output_path().trim_end_matches('/');

        if !self.config.archive() {
            for file in &result.files {
                tracing::debug!("Writing {} ({} bytes)", file.name, file.contents.len());
                self.output
                    .write_file(&file.name, file.contents.as_bytes())
                    .await?;
            }
            return Ok(output_path.to_string());
        }

        tracing::debug!("Creating ZIP file with {} files", result.files.len());
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for file in &result.files {
                zip.start_file(file.name.as_str(), SimpleFileOptions::default())?;
                zip.write_all(file.contents.as_bytes())?;
            }
            zip.finish()?.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.output.write_file(ARCHIVE_FILE, &zip_data).await?;
        Ok(format!("{}/{}", output_path, ARCHIVE_FILE))
    }
}
