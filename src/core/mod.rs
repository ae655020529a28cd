pub mod loan;
pub mod payment;
pub mod report;
pub mod session;

pub use crate::domain::model::{
    InvestmentAnalysis, LineItemKey, MonthlyPayment, PropertyInput,
};
pub use crate::domain::ports::{AnalysisProvider, ConfigProvider, ReportSink};
pub use crate::utils::error::Result;
