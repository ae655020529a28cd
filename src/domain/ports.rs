use crate::domain::model::{InvestmentAnalysis, MonthlyPayment, PropertyInput};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Destination for the rendered report bundle.
pub trait ReportSink: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Settings the binaries need to reach the gateway and place output.
pub trait ConfigProvider: Send + Sync {
    fn gateway_endpoint(&self) -> &str;
    fn gateway_model(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn timeout_seconds(&self) -> Option<u64>;
    fn output_path(&self) -> &str;
}

/// The remote scoring collaborator. One attempt per submission; the caller
/// does not retry.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(
        &self,
        input: &PropertyInput,
        payment: Option<&MonthlyPayment>,
    ) -> Result<InvestmentAnalysis>;
}
