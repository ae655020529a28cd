use crate::core::report::{self, ReportBundle};
use crate::domain::model::{AnalysisStep, InvestmentAnalysis, MonthlyPayment, PropertyInput};
use crate::domain::ports::{AnalysisProvider, ReportSink};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use crate::utils::validation::Validate;

pub const REPORT_TEXT_FILE: &str = "report.txt";
pub const REPORT_JSON_FILE: &str = "report.json";
pub const SCORES_CSV_FILE: &str = "scores.csv";

/// Orchestrates one analysis session: validate the input, call the remote
/// scoring provider once, attach the local payment snapshot, persist the
/// report bundle.
pub struct AnalysisEngine<P: AnalysisProvider, S: ReportSink> {
    provider: P,
    sink: S,
    monitor: SystemMonitor,
}

impl<P: AnalysisProvider, S: ReportSink> AnalysisEngine<P, S> {
    pub fn new(provider: P, sink: S) -> Self {
        Self::new_with_monitoring(provider, sink, false)
    }

    pub fn new_with_monitoring(provider: P, sink: S, monitor_enabled: bool) -> Self {
        Self {
            provider,
            sink,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(
        &self,
        input: &PropertyInput,
        payment: Option<&MonthlyPayment>,
    ) -> Result<InvestmentAnalysis> {
        input.validate()?;
        tracing::info!(
            "Analyzing property: {} {} at {}",
            input.state,
            input.property_type,
            input.listing_url
        );

        // The gateway covers listing, safety, demographics and scoring in a
        // single exchange; the step progression is traced, not awaited.
        for step in [
            AnalysisStep::FetchingListing,
            AnalysisStep::AnalyzingSafety,
            AnalysisStep::AnalyzingDemographics,
            AnalysisStep::CalculatingScore,
        ] {
            tracing::info!("Analysis step: {}", step.as_str());
        }
        self.monitor.log_stats("Gateway request");

        let mut analysis = match self.provider.analyze(input, payment).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::error!("Analysis step: {} ({})", AnalysisStep::Error.as_str(), e);
                return Err(e);
            }
        };
        self.monitor.log_stats("Gateway response");

        // The provider's payload never carries the local breakdown; attach
        // the snapshot here, zeroed when none was supplied.
        analysis.monthly_payment = payment.cloned().unwrap_or_default();

        let bundle = report::render_bundle(&analysis)?;
        self.write_bundle(&bundle).await?;

        tracing::info!("Analysis step: {}", AnalysisStep::Complete.as_str());
        tracing::info!(
            "Analysis complete, score: {:.0} ({})",
            analysis.overall_score,
            analysis.verdict.as_str()
        );
        self.monitor.log_stats("Report written");

        Ok(analysis)
    }

    async fn write_bundle(&self, bundle: &ReportBundle) -> Result<()> {
        self.sink
            .write_file(REPORT_TEXT_FILE, bundle.text.as_bytes())
            .await?;
        self.sink
            .write_file(REPORT_JSON_FILE, bundle.json.as_bytes())
            .await?;
        self.sink
            .write_file(SCORES_CSV_FILE, bundle.scores_csv.as_bytes())
            .await?;
        Ok(())
    }
}
