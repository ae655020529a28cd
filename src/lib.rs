pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::gateway::{GatewayAnalysisProvider, GatewaySettings};
pub use adapters::storage::LocalReportSink;
pub use core::loan::{DownPayment, LoanTerms};
pub use core::payment::PaymentModel;
pub use core::session::AnalysisEngine;
pub use domain::model::{InvestmentAnalysis, LineItemKey, MonthlyPayment, PropertyInput};
pub use utils::error::{Result, ScoreError};
