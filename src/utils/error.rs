use thiserror::Error;

#[derive(Error, Debug)]
pub enum PbnError {
    #[error("Unsupported file format: {extension}. Allowed: csv, xlsx, xls")]
    UnsupportedFileFormat { extension: String },

    #[error("Failed to parse import file: {message}")]
    ParseError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet processing error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Import blocked by {error_count} validation errors")]
    ImportBlocked { error_count: usize },

    #[error("No valid data to import")]
    EmptyBatch,

    #[error("Operation already in progress: {operation}")]
    Busy { operation: String },

    #[error("Bulk import submission failed: {message}")]
    SubmissionError { message: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API responded with status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid {entity} input: {message}")]
    InputValidation { entity: String, message: String },

    #[error("Rich text editor unavailable: {message}")]
    EditorUnavailable { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    FileFormat,
    Parse,
    Validation,
    Submission,
    Network,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PbnError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PbnError::UnsupportedFileFormat { .. } => ErrorCategory::FileFormat,
            PbnError::ParseError { .. }
            | PbnError::CsvError(_)
            | PbnError::SpreadsheetError(_) => ErrorCategory::Parse,
            PbnError::ImportBlocked { .. }
            | PbnError::EmptyBatch
            | PbnError::InputValidation { .. } => ErrorCategory::Validation,
            PbnError::SubmissionError { .. } | PbnError::Busy { .. } => ErrorCategory::Submission,
            PbnError::ApiError(_) | PbnError::HttpStatus { .. } | PbnError::NotFound { .. } => {
                ErrorCategory::Network
            }
            PbnError::ConfigError { .. }
            | PbnError::MissingConfigError { .. }
            | PbnError::InvalidConfigValueError { .. }
            | PbnError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            PbnError::IoError(_)
            | PbnError::SerializationError(_)
            | PbnError::EditorUnavailable { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::FileFormat | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Parse => ErrorSeverity::High,
            ErrorCategory::Submission | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PbnError::UnsupportedFileFormat { .. } => {
                "Format file tidak didukung. Gunakan CSV atau Excel".to_string()
            }
            PbnError::ParseError { message } => format!("Error parsing file: {}", message),
            PbnError::CsvError(e) => format!("Error parsing CSV: {}", e),
            PbnError::SpreadsheetError(_) => "Error reading Excel file".to_string(),
            PbnError::ImportBlocked { error_count } => {
                format!("Found {} validation errors", error_count)
            }
            PbnError::EmptyBatch => "No valid data to import".to_string(),
            PbnError::Busy { operation } => format!("Please wait, {} is in progress", operation),
            PbnError::SubmissionError { .. } => "Failed to import domains".to_string(),
            PbnError::ApiError(_) | PbnError::HttpStatus { .. } => {
                "Could not reach the DomainPBN backend".to_string()
            }
            PbnError::NotFound { resource } => format!("{} not found", resource),
            PbnError::InputValidation { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::FileFormat => "Upload a .csv, .xlsx or .xls file",
            ErrorCategory::Parse => "Check that the file is a valid CSV or Excel workbook with a header row",
            ErrorCategory::Validation => "Fix the listed rows or fields and try again",
            ErrorCategory::Submission => "Wait for the running operation to finish, then retry the same import",
            ErrorCategory::Network => "Check --api-url and that the backend is running",
            ErrorCategory::Configuration => "Review the CLI flags and the TOML configuration file",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, PbnError>;
