use clap::Parser;
use propscore::core::report::format_usd;
use propscore::utils::error::ErrorSeverity;
use propscore::utils::{logger, validation::Validate};
use propscore::{
    AnalysisEngine, CliConfig, GatewayAnalysisProvider, GatewaySettings, InvestmentAnalysis,
    LocalReportSink, PaymentModel,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting propscore");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    let output_path = config.output_path.clone();
    match run(config).await {
        Ok(analysis) => {
            tracing::info!("✅ Analysis completed successfully!");
            println!(
                "✅ {} ({:.0}%)",
                analysis.verdict.as_str(),
                analysis.overall_score
            );
            println!(
                "💰 Total monthly payment: {}",
                format_usd(analysis.monthly_payment.total)
            );
            println!("📁 Report saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run(config: CliConfig) -> propscore::Result<InvestmentAnalysis> {
    config.validate()?;

    let terms = config.loan_terms()?;
    let input = config.property_input(&terms);
    input.validate()?;

    let mut model = PaymentModel::new(&terms);
    model.set_observer(|payment| {
        tracing::debug!("Payment breakdown updated, total {}", format_usd(payment.total));
    });
    for (key, raw) in config.line_item_overrides()? {
        model.set_line_item(key, &raw);
    }

    let snapshot = model.snapshot();
    tracing::info!(
        "Monthly payment: {} P&I, {} total",
        format_usd(snapshot.principal_and_interest),
        format_usd(snapshot.total)
    );

    let settings = GatewaySettings::from_config(&config)?;
    let provider = GatewayAnalysisProvider::new(settings);
    let sink = LocalReportSink::new(config.output_path.clone());
    let engine = AnalysisEngine::new_with_monitoring(provider, sink, config.monitor);

    engine.run(&input, Some(&snapshot)).await
}
