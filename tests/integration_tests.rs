use anyhow::Result;
use httpmock::prelude::*;
use social_charts::core::pipeline::{
    ARCHIVE_FILE, BOX_PLOT_FILE, GROUPED_BAR_FILE, HTML_FILE, LINE_CHART_FILE, SUMMARIES_FILE,
};
use social_charts::{ChartEngine, ChartError, ChartPipeline, CliConfig, LocalStorage, TomlConfig};
use std::path::Path;
use tempfile::TempDir;

const LIKES: &str = "\
Platform,PostType,Date,Likes
Instagram,Image,3/1/2024,120
Instagram,Video,3/2/2024,480
Instagram,Carousel,3/3/2024,300
Facebook,Image,3/1/2024,60
Facebook,Link,3/2/2024,20
Twitter,Image,3/1/2024,45
Twitter,Video,3/2/2024,95
Twitter,Link,3/3/2024,15
Twitter,Image,3/4/2024,70
";

const AVERAGES: &str = "\
Platform,PostType,AvgLikes
Instagram,Image,210.5
Instagram,Video,480
Instagram,Carousel,300
Facebook,Image,60
Facebook,Link,20
Twitter,Image,57.5
Twitter,Video,95
";

const TIMELINE: &str = "\
Date,AvgLikes
3/1/2024 (Friday),75
3/2/2024 (Saturday),198.3
3/3/2024 (Sunday),157.5
3/4/2024 (Monday),70
";

fn write_inputs(dir: &Path) -> Result<()> {
    std::fs::write(dir.join("socialMedia.csv"), LIKES)?;
    std::fs::write(dir.join("socialMediaAvg.csv"), AVERAGES)?;
    std::fs::write(dir.join("socialMediaTime.csv"), TIMELINE)?;
    Ok(())
}

fn cli_config(input_dir: &Path, output_dir: &Path) -> CliConfig {
    CliConfig {
        box_plot_csv: "socialMedia.csv".to_string(),
        grouped_bar_csv: "socialMediaAvg.csv".to_string(),
        line_chart_csv: "socialMediaTime.csv".to_string(),
        input_dir: input_dir.to_str().unwrap().to_string(),
        output_path: output_dir.to_str().unwrap().to_string(),
        width: 800,
        height: 400,
        archive: false,
        verbose: false,
    }
}

fn engine_for(config: CliConfig) -> ChartEngine<ChartPipeline<LocalStorage, CliConfig>> {
    let input = LocalStorage::new(config.input_dir.clone());
    let output = LocalStorage::new(config.output_path.clone());
    ChartEngine::new(ChartPipeline::new(input, output, config))
}

#[tokio::test]
async fn test_end_to_end_writes_every_chart() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    write_inputs(input_dir.path())?;

    let engine = engine_for(cli_config(input_dir.path(), output_dir.path()));
    let output_path = engine.run().await?;
    assert_eq!(output_path, output_dir.path().to_str().unwrap());

    for name in [BOX_PLOT_FILE, GROUPED_BAR_FILE, LINE_CHART_FILE, HTML_FILE, SUMMARIES_FILE] {
        assert!(output_dir.path().join(name).exists(), "missing {name}");
    }

    let box_svg = std::fs::read_to_string(output_dir.path().join(BOX_PLOT_FILE))?;
    assert_eq!(box_svg.matches(r#"fill="steelblue""#).count(), 3);
    assert!(box_svg.contains(">Instagram</text>"));
    assert!(box_svg.contains(">Twitter</text>"));

    let bar_svg = std::fs::read_to_string(output_dir.path().join(GROUPED_BAR_FILE))?;
    assert_eq!(bar_svg.matches(r#"class="bar-group""#).count(), 7);
    assert!(bar_svg.contains(">Carousel</text>"));

    let line_svg = std::fs::read_to_string(output_dir.path().join(LINE_CHART_FILE))?;
    assert_eq!(line_svg.matches(r#"class="line""#).count(), 1);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_dir.path().join(SUMMARIES_FILE))?)?;
    let groups = report["groups"].as_array().unwrap();
    let order: Vec<&str> = groups.iter().map(|g| g["group"].as_str().unwrap()).collect();
    assert_eq!(order, vec!["Instagram", "Facebook", "Twitter"]);

    // Twitter: [15, 45, 70, 95]
    assert_eq!(groups[2]["min"], 15.0);
    assert_eq!(groups[2]["q1"], 37.5);
    assert_eq!(groups[2]["median"], 57.5);
    assert_eq!(groups[2]["q3"], 76.25);
    assert_eq!(groups[2]["max"], 95.0);
    assert_eq!(report["value_axis_max"], 480.0);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_archive() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    write_inputs(input_dir.path())?;

    let mut config = cli_config(input_dir.path(), output_dir.path());
    config.archive = true;
    let output_path = engine_for(config).run().await?;
    assert!(output_path.ends_with(ARCHIVE_FILE));

    let zip_path = output_dir.path().join(ARCHIVE_FILE);
    assert!(zip_path.exists());
    assert!(!output_dir.path().join(BOX_PLOT_FILE).exists());

    let mut archive = zip::ZipArchive::new(std::fs::File::open(zip_path)?)?;
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).map(|f| f.name().to_string()))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    assert!(names.contains(&SUMMARIES_FILE.to_string()));
    assert!(names.contains(&HTML_FILE.to_string()));
    assert_eq!(names.len(), 5);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_with_remote_source() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    write_inputs(input_dir.path())?;

    let server = MockServer::start();
    let avg_mock = server.mock(|when, then| {
        when.method(GET).path("/data/socialMediaAvg.csv");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body("Platform,PostType,AvgLikes\nLinkedIn,Article,42\n");
    });

    let mut config = cli_config(input_dir.path(), output_dir.path());
    config.grouped_bar_csv = server.url("/data/socialMediaAvg.csv");
    engine_for(config).run().await?;
    avg_mock.assert();

    let bar_svg = std::fs::read_to_string(output_dir.path().join(GROUPED_BAR_FILE))?;
    assert!(bar_svg.contains(">LinkedIn</text>"));
    assert!(bar_svg.contains(">Article</text>"));
    Ok(())
}

#[tokio::test]
async fn test_bad_row_fails_without_output() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    write_inputs(input_dir.path())?;
    std::fs::write(
        input_dir.path().join("socialMedia.csv"),
        "Platform,Likes\nInstagram,10\nFacebook,n/a\n",
    )?;

    let err = engine_for(cli_config(input_dir.path(), output_dir.path()))
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, ChartError::ParseError { line: 3, .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(!output_dir.path().join(BOX_PLOT_FILE).exists());
    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_pipeline() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    write_inputs(input_dir.path())?;

    let toml_content = format!(
        r#"
[pipeline]
name = "toml-run"

[source]
input_dir = "{}"
box_plot = "socialMedia.csv"
grouped_bar = "socialMediaAvg.csv"
line_chart = "socialMediaTime.csv"

[layout]
width = 640
height = 320

[load]
output_path = "{}"
"#,
        input_dir.path().to_str().unwrap().replace('\\', "/"),
        output_dir.path().to_str().unwrap().replace('\\', "/"),
    );
    let config_path = input_dir.path().join("charts.toml");
    tokio::fs::write(&config_path, toml_content).await?;
    let config = TomlConfig::from_file(&config_path)?;

    let input = LocalStorage::new(config.input_dir().to_string());
    let output = LocalStorage::new(config.load.output_path.clone());
    ChartEngine::new(ChartPipeline::new(input, output, config))
        .run()
        .await?;

    let line_svg = std::fs::read_to_string(output_dir.path().join(LINE_CHART_FILE))?;
    assert!(line_svg.contains(r#"width="640" height="320""#));

    let html = std::fs::read_to_string(output_dir.path().join(HTML_FILE))?;
    assert!(html.contains("<title>toml-run</title>"));
    Ok(())
}
