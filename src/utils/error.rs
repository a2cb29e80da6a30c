use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Document not found: {url}")]
    NotFound { url: String },

    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Not a recognised repository URL: {url}")]
    InvalidUrl { url: String },

    #[error("Failed to parse document from {url}: {message}")]
    ParseError { url: String, message: String },

    #[error("Expected element '{element}' missing in {url}")]
    MissingElement { url: String, element: String },

    #[error("Task for {url} timed out after {seconds}s")]
    TaskTimeout { url: String, seconds: u64 },

    #[error("No services were extracted from {url}")]
    EmptyCatalog { url: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parsing,
    Output,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::HttpError(_)
            | EtlError::NotFound { .. }
            | EtlError::UnexpectedStatus { .. }
            | EtlError::TaskTimeout { .. } => ErrorCategory::Network,
            EtlError::InvalidUrl { .. }
            | EtlError::ParseError { .. }
            | EtlError::MissingElement { .. } => ErrorCategory::Parsing,
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::Output
            }
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
            EtlError::EmptyCatalog { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Parsing => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::HttpError(_) | EtlError::UnexpectedStatus { .. } => {
                "Check network connectivity and whether GitHub is rate limiting this host".to_string()
            }
            EtlError::NotFound { url } => format!("Verify that {} still exists", url),
            EtlError::InvalidUrl { .. } => {
                "Only github.com/{owner}/{repo} style links can be enriched".to_string()
            }
            EtlError::ParseError { .. } | EtlError::MissingElement { .. } => {
                "The page layout may have changed; inspect the HTML and update the selectors"
                    .to_string()
            }
            EtlError::TaskTimeout { .. } => {
                "Raise --task-timeout-secs or leave it unset to wait indefinitely".to_string()
            }
            EtlError::EmptyCatalog { .. } => {
                "Check --target-url points at a rendered README listing page".to_string()
            }
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                "Make sure the output directory exists and is writable".to_string()
            }
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Review the command line flags or TOML configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Parsing => format!("Could not understand a page: {}", self),
            ErrorCategory::Output => format!("Failed to write output: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Nothing to write: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
