use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Authentication failed: {message}")]
    AuthenticationError { message: String },

    #[error("{message}")]
    NotFoundError { message: String },

    #[error("Upstream responded with status {status}: {message}")]
    UpstreamError { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Authentication,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DashboardError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DashboardError::ApiError(_) | DashboardError::UpstreamError { .. } => {
                ErrorCategory::Network
            }
            DashboardError::CsvError(_)
            | DashboardError::SerializationError(_)
            | DashboardError::ZipError(_)
            | DashboardError::ProcessingError { .. }
            | DashboardError::ValidationError { .. }
            | DashboardError::NotFoundError { .. } => ErrorCategory::Data,
            DashboardError::ConfigError { .. }
            | DashboardError::ConfigValidationError { .. }
            | DashboardError::InvalidConfigValueError { .. }
            | DashboardError::MissingConfigError { .. } => ErrorCategory::Configuration,
            DashboardError::AuthenticationError { .. } => ErrorCategory::Authentication,
            DashboardError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DashboardError::NotFoundError { .. } => ErrorSeverity::Low,
            DashboardError::ApiError(_) | DashboardError::UpstreamError { .. } => {
                ErrorSeverity::Medium
            }
            DashboardError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the evaluation API: {}", self),
            ErrorCategory::Authentication => {
                "Authentication failed, verify your password".to_string()
            }
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not process project data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the endpoint URL and network connectivity, then retry",
            ErrorCategory::Authentication => {
                "Check APP_PASSWORD or the password passed on the command line"
            }
            ErrorCategory::Configuration => "Review the TOML configuration and environment variables",
            ErrorCategory::Data => "Refresh the entries file and check the scoring dictionary",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
