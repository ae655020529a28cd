use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoreError {
    #[error("Gateway request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Missing configuration: {field}")]
    MissingConfig { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Analysis gateway rate limit exceeded")]
    RateLimited,

    #[error("Analysis gateway credits exhausted")]
    CreditsExhausted,

    #[error("Analysis gateway returned status {status}")]
    GatewayStatus { status: u16, body: String },

    #[error("Invalid gateway response: {message}")]
    InvalidResponse { message: String },

    #[error("Report rendering failed: {message}")]
    ReportError { message: String },
}

pub type Result<T> = std::result::Result<T, ScoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Input,
    Network,
    Gateway,
    Output,
}

/// Severity drives the process exit code in the binaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoreError::MissingConfig { .. } => ErrorCategory::Config,
            ScoreError::InvalidValue { .. } => ErrorCategory::Input,
            ScoreError::RequestError(_) => ErrorCategory::Network,
            ScoreError::RateLimited
            | ScoreError::CreditsExhausted
            | ScoreError::GatewayStatus { .. }
            | ScoreError::InvalidResponse { .. } => ErrorCategory::Gateway,
            ScoreError::SerializationError(_)
            | ScoreError::CsvError(_)
            | ScoreError::IoError(_)
            | ScoreError::ReportError { .. } => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ScoreError::RateLimited | ScoreError::CreditsExhausted => ErrorSeverity::Medium,
            ScoreError::RequestError(_) => ErrorSeverity::Medium,
            ScoreError::MissingConfig { .. }
            | ScoreError::InvalidValue { .. }
            | ScoreError::GatewayStatus { .. }
            | ScoreError::InvalidResponse { .. } => ErrorSeverity::High,
            ScoreError::SerializationError(_)
            | ScoreError::CsvError(_)
            | ScoreError::ReportError { .. } => ErrorSeverity::High,
            ScoreError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScoreError::RequestError(_) => "Check network connectivity and the gateway endpoint",
            ScoreError::RateLimited => "Wait a moment and submit the analysis again",
            ScoreError::CreditsExhausted => "Add credits to the gateway account before retrying",
            ScoreError::GatewayStatus { .. } => {
                "Verify the gateway endpoint, model id and API key"
            }
            ScoreError::InvalidResponse { .. } => {
                "Retry the analysis; if it persists, the gateway contract may have changed"
            }
            ScoreError::MissingConfig { .. } => {
                "Provide the missing setting via flag, profile file or environment variable"
            }
            ScoreError::InvalidValue { .. } => "Correct the rejected input value and rerun",
            ScoreError::IoError(_) => "Check that the output path exists and is writable",
            ScoreError::SerializationError(_)
            | ScoreError::CsvError(_)
            | ScoreError::ReportError { .. } => "Rerun with --verbose and inspect the logs",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScoreError::RateLimited => {
                "Rate limit exceeded. Please try again in a moment.".to_string()
            }
            ScoreError::CreditsExhausted => {
                "AI credits exhausted. Please add credits to continue.".to_string()
            }
            ScoreError::MissingConfig { field } => {
                format!("Missing required setting: {}", field)
            }
            ScoreError::InvalidValue { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}
