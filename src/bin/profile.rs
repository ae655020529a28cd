use clap::Parser;
use propscore::core::report::format_usd;
use propscore::domain::ports::ConfigProvider;
use propscore::utils::{logger, validation::Validate};
use propscore::{
    AnalysisEngine, GatewayAnalysisProvider, GatewaySettings, LocalReportSink, PaymentModel,
    TomlConfig,
};

#[derive(Parser)]
#[command(name = "propscore-profile")]
#[command(about = "Scores a property from a TOML analysis profile")]
struct Args {
    /// Path to the TOML profile file
    #[arg(short, long, default_value = "propscore.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the profile's monitoring setting
    #[arg(long)]
    monitor: Option<bool>,

    /// Validate the profile and show the payment breakdown without calling
    /// the gateway
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting propscore profile run");
    tracing::info!("📁 Loading profile from: {}", args.config);

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load profile '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML");
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        tracing::error!("❌ Profile validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Profile '{}' loaded and validated", config.profile.name);

    let terms = match config.loan_terms() {
        Ok(terms) => terms,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    let input = config.property_input(&terms);

    let mut model = PaymentModel::new(&terms);
    match config.line_item_overrides() {
        Ok(overrides) => {
            for (key, raw) in overrides {
                model.set_line_item(key, &raw);
            }
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    }
    let snapshot = model.snapshot();
    drop(model);

    println!("Monthly payment breakdown for '{}':", config.profile.name);
    for key in propscore::LineItemKey::ALL {
        println!("  {:<21} {}", key.label(), format_usd(snapshot.get(key)));
    }
    println!("  {:<21} {}", "Total", format_usd(snapshot.total));

    if args.dry_run {
        tracing::info!("🔍 DRY RUN - skipping the gateway call");
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());

    let settings = match GatewaySettings::from_config(&config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    let provider = GatewayAnalysisProvider::new(settings);
    let sink = LocalReportSink::new(config.output_path().to_string());
    let engine = AnalysisEngine::new_with_monitoring(provider, sink, monitor_enabled);

    match engine.run(&input, Some(&snapshot)).await {
        Ok(analysis) => {
            println!(
                "✅ {} ({:.0}%)",
                analysis.verdict.as_str(),
                analysis.overall_score
            );
            println!("📁 Report saved to: {}", config.output_path());
        }
        Err(e) => {
            tracing::error!("❌ Analysis failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    }

    Ok(())
}
