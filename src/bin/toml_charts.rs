use clap::Parser;
use social_charts::config::toml_config::TomlConfig;
use social_charts::core::loader::{parse_likes, source_name};
use social_charts::core::{summarize::summarize, ConfigProvider, Storage};
use social_charts::utils::{logger, validation::Validate};
use social_charts::{ChartEngine, ChartPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-charts")]
#[command(about = "Chart renderer driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "charts.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the archive setting from config
    #[arg(long)]
    archive: Option<bool>,

    /// Load and summarize the box plot data without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 先載入配置，日誌格式取決於配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(if args.verbose { "debug" } else { config.log_level() });
    } else {
        logger::init_cli_logger(args.verbose || config.log_level() == "debug");
    }

    tracing::info!("🚀 Starting TOML-based chart renderer");
    tracing::info!("📁 Configuration loaded from: {}", args.config);

    if let Some(archive) = args.archive {
        config.load.archive = Some(archive);
        tracing::info!("🔧 Archive mode overridden to: {}", archive);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        if let Err(e) = perform_dry_run(&config).await {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
        return Ok(());
    }

    let input = LocalStorage::new(config.input_dir().to_string());
    let output = LocalStorage::new(config.output_path().to_string());
    let pipeline = ChartPipeline::new(input, output, config);
    let engine = ChartEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Charts rendered successfully!");
            println!("✅ Charts rendered successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Chart generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig) {
    tracing::info!("📋 Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        tracing::info!("📝 Description: {}", description);
    }
    tracing::info!("📥 Box plot source: {}", config.box_plot_source());
    tracing::info!("📥 Grouped bar source: {}", config.grouped_bar_source());
    tracing::info!("📥 Line chart source: {}", config.line_chart_source());
    tracing::info!(
        "📐 Chart size: {}x{}",
        config.chart_width(),
        config.chart_height()
    );
    tracing::info!("📦 Archive: {}", config.archive());
}

async fn perform_dry_run(config: &TomlConfig) -> social_charts::Result<()> {
    let source = config.box_plot_source();
    if social_charts::utils::validation::is_remote_source(source) {
        println!("🌐 {} would be fetched over HTTP; skipping in dry run", source);
        return Ok(());
    }

    let input = LocalStorage::new(config.input_dir().to_string());
    let records = parse_likes(&source_name(source), &input.read_file(source).await?)?;
    let summaries = summarize(Some(records.as_slice()))?;

    println!("📊 {} records in {} groups", records.len(), summaries.len());
    for (group, s) in summaries.iter() {
        println!(
            "  {:<12} min={:<8} q1={:<8} median={:<8} q3={:<8} max={}",
            group, s.min, s.q1, s.median, s.q3, s.max
        );
    }
    println!("📁 Output would be written to: {}", config.output_path());
    Ok(())
}
